use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::record::ItemType;

#[derive(Parser, Debug)]
#[command(name = "portfolio-explorer")]
#[command(about = "A file-explorer style browser and editor for a portfolio content tree")]
pub struct Cli {
    /// JSON record store (overrides the config file and the environment)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the built-in sample tree instead of a store file
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run,
    /// Print the tree and any integrity problems
    Tree {
        /// Print as JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
    /// Create a folder or file
    Add {
        #[arg(short, long)]
        name: String,
        /// folder or file
        #[arg(short = 't', long = "type", default_value = "file")]
        item_type: ItemType,
        /// Parent folder id (root when omitted)
        #[arg(short, long)]
        parent: Option<String>,
        /// Inline document text
        #[arg(long)]
        text: Option<String>,
        /// Link target
        #[arg(long)]
        href: Option<String>,
    },
    /// Change an existing record
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "clear_href")]
        href: Option<String>,
        /// Remove the link target
        #[arg(long)]
        clear_href: bool,
        /// Move under this folder id
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,
        /// Move to the top level
        #[arg(long)]
        root: bool,
        /// folder or file
        #[arg(short = 't', long = "type")]
        item_type: Option<ItemType>,
    },
    /// Delete a record and everything below it
    Remove { id: String },
    /// Execute explorer commands headlessly and print the resulting state
    Exec {
        /// Command to execute (e.g. "enter:drive-c", "sequence:[enter:drive-c,back]")
        #[arg(short = 'x', long)]
        command: String,
        /// Output file for the result (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also print a screenshot of the result
        #[arg(long)]
        screenshot: bool,
        /// Terminal width for the screenshot
        #[arg(long, default_value = "120")]
        width: u16,
        /// Terminal height for the screenshot
        #[arg(long, default_value = "40")]
        height: u16,
    },
}
