use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xcursorctx", about = "Inspect X11 cursor configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect to a display and print the resolved cursor context
    Show {
        /// Display to connect to (defaults to $DISPLAY)
        #[arg(long)]
        display: Option<String>,

        /// Screen number (defaults to the display's default screen)
        #[arg(long)]
        screen: Option<usize>,
    },

    /// Parse a resource database dump, e.g. `xrdb -query` output
    Parse {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,

        /// Screen width used for the geometry fallback
        #[arg(long, default_value_t = 1920)]
        width: u16,

        /// Screen height used for the geometry fallback
        #[arg(long, default_value_t = 1080)]
        height: u16,
    },
}
