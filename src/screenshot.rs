use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use crate::app::App;
use crate::error::{ExplorerError, Result};
use crate::ui;

/// Draw the app once on an off-screen terminal and return the text grid
pub fn render_to_string(app: &App, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).map_err(ExplorerError::Io)?;

    terminal
        .draw(|frame| {
            ui::draw(frame, app);
        })
        .map_err(ExplorerError::Io)?;

    Ok(buffer_to_string(terminal.backend().buffer()))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            let sym = buffer[(x, y)].symbol();

            // Wide glyphs leave an empty trailing cell
            if sym.is_empty() {
                result.push(' ');
            } else {
                result.push_str(sym);
            }
        }
        result.push('\n');
    }

    result
}
