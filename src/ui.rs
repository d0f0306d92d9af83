use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, PanelFocus, ViewMode};
use crate::classify::{icon_for, sidebar_icon};
use crate::config::ColorConfig;

pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_title_bar(frame, app, rows[0]);
    match app.view {
        ViewMode::Explorer => draw_explorer(frame, app, rows[1]),
        ViewMode::Admin => draw_admin(frame, app, rows[1]),
    }
    draw_status_bar(frame, app, rows[2]);

    if app.view == ViewMode::Explorer {
        draw_notepad(frame, app, frame.area());
    }
}

fn border_style(colors: &ColorConfig, is_active: bool) -> Style {
    if is_active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view {
        ViewMode::Explorer => " File Explorer",
        ViewMode::Admin => " File Explorer - Admin",
    };
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn draw_explorer(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let side_width = app.config.layout.side_tree_width.min(100);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side_width),
            Constraint::Percentage(100 - side_width),
        ])
        .split(rows[1]);

    draw_navigation_bar(frame, app, rows[0]);
    draw_side_tree(frame, app, body[0]);
    draw_contents(frame, app, body[1]);
}

fn draw_navigation_bar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let (can_back, can_forward) = match &app.explorer {
        Some(nav) => (nav.can_go_back(), nav.can_go_forward()),
        None => (false, false),
    };
    let arrow = |enabled: bool, glyph: &'static str| {
        if enabled {
            Span::styled(glyph, Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::styled(glyph, Style::default().fg(colors.disabled))
        }
    };

    let line = Line::from(vec![
        arrow(can_back, "←"),
        Span::raw(" "),
        arrow(can_forward, "→"),
        Span::raw("  "),
        Span::raw(app.breadcrumb()),
    ]);
    let block = Block::default()
        .title(" Address ")
        .borders(Borders::ALL)
        .border_style(border_style(colors, false));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_side_tree(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let is_active = app.active_panel == PanelFocus::SideTree;
    let block = Block::default()
        .title(" Folders ")
        .borders(Borders::ALL)
        .border_style(border_style(colors, is_active));

    let rows = app.side_tree_rows();
    if rows.is_empty() {
        let paragraph = Paragraph::new("No items")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
        return;
    }

    let current_id = app.explorer.as_ref().map(|nav| nav.current().id.as_str());
    let items: Vec<ListItem> = rows
        .iter()
        .map(|(node, depth)| {
            let marker = if node.is_folder() && node.has_children() {
                let expanded = app
                    .explorer
                    .as_ref()
                    .map(|nav| nav.is_expanded(&node.id))
                    .unwrap_or(false);
                if expanded {
                    "▼"
                } else {
                    "▶"
                }
            } else {
                " "
            };
            let text = format!(
                "{}{} {} {}",
                " ".repeat(depth * 2),
                marker,
                sidebar_icon(node).glyph(),
                node.name
            );

            let style = if Some(node.id.as_str()) == current_id {
                Style::default()
                    .fg(colors.current_folder)
                    .add_modifier(Modifier::BOLD)
            } else if node.is_folder() {
                Style::default().fg(colors.folder)
            } else {
                Style::default().fg(colors.link)
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(colors.selected_item)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    let mut list_state = ListState::default();
    if is_active {
        list_state.select(Some(app.side_tree_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_contents(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let is_active = app.active_panel == PanelFocus::Contents;
    let title = match &app.explorer {
        Some(nav) => format!(" {} ", nav.current().name),
        None => " Contents ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(colors, is_active));

    let contents = app.contents();
    if contents.is_empty() {
        let message = if app.explorer.is_some() {
            "This folder is empty."
        } else {
            "No items"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = contents
        .iter()
        .map(|node| {
            let mut spans = vec![
                Span::raw(format!("{} ", icon_for(node).glyph())),
                Span::styled(
                    node.name.clone(),
                    if node.is_folder() {
                        Style::default().fg(colors.folder)
                    } else {
                        Style::default().fg(colors.link)
                    },
                ),
            ];
            if let Some(href) = &node.href {
                spans.push(Span::styled(
                    format!("  {}", href),
                    Style::default().fg(Color::Gray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(colors.selected_item).fg(Color::Black))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if is_active {
        list_state.select(Some(app.contents_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_notepad(frame: &mut Frame, app: &App, area: Rect) {
    let Some(document) = app.opened_document() else {
        return;
    };

    let popup = centered_rect(70, 60, area);
    let block = Block::default()
        .title(format!(" {} - Notepad ", document.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.colors.active_border));
    let text = document.text.clone().unwrap_or_default();
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn draw_admin(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let picked = app.admin.picker.selected_parent();
    let pick_marker = |is_picked: bool| if is_picked { "● " } else { "  " };

    let mut items = vec![ListItem::new(Line::from(vec![
        Span::raw(pick_marker(picked.is_none())),
        Span::styled("📂 Root", Style::default().add_modifier(Modifier::BOLD)),
    ]))];
    items.extend(app.tree.all_nodes_with_depth().into_iter().map(|(node, depth)| {
        let style = if node.is_folder() {
            Style::default().fg(colors.folder)
        } else {
            Style::default().fg(colors.link)
        };
        ListItem::new(Line::from(vec![
            Span::raw(pick_marker(picked == Some(node.id.as_str()))),
            Span::raw(" ".repeat((depth + 1) * 2)),
            Span::styled(format!("{} {}", sidebar_icon(node).glyph(), node.name), style),
        ]))
    }));

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Items ")
                .borders(Borders::ALL)
                .border_style(border_style(colors, app.admin.input.is_none())),
        )
        .highlight_style(Style::default().bg(colors.selected_item).fg(Color::Black));
    let mut list_state = ListState::default();
    list_state.select(Some(app.admin.cursor));
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    let (title, text) = match &app.admin.input {
        Some(input) => (input.title(), format!("{}_", input.buffer)),
        None => {
            let parent = picked
                .and_then(|id| app.tree.find_node(id))
                .map(|node| node.name.as_str())
                .unwrap_or("Root");
            (" Parent ".to_string(), parent.to_string())
        }
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(colors, app.admin.input.is_some())),
    );
    frame.render_widget(input, rows[1]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.config.colors;
    let status_text = if app.is_loading {
        format!("Loading... | {}", app.status_message)
    } else {
        app.status_message.clone()
    };

    let help_text = match app.view {
        ViewMode::Explorer if app.opened_document().is_some() => "Esc: Close",
        ViewMode::Explorer => {
            "Tab: Panel | Enter: Open | Space: Expand | [/Bksp: Back | ]: Forward | a: Admin | q: Quit"
        }
        ViewMode::Admin if app.admin.input.is_some() => "Enter: Next/Save | Esc: Cancel",
        ViewMode::Admin => {
            "Enter: Pick parent | n/f: New folder/file | e: Rename | m: Move here | d: Delete | a: Explorer"
        }
    };

    let status_line = Line::from(vec![
        Span::styled(status_text, Style::default().fg(colors.status_bar_fg)),
        Span::raw(" | "),
        Span::styled(help_text, Style::default().fg(Color::Gray)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(colors.status_bar_bg));
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
