//! Argument parsing for the demo binary.

use clap::Parser;

use crate::config::ListConfig;

/// Demo REPL for the list data-structure core.
#[derive(Parser, Debug)]
#[command(name = "listd", version, about = "In-memory list core demo REPL")]
pub struct Cli {
    /// Entries larger than this many bytes force node-list representation.
    #[arg(long, default_value_t = 64)]
    pub string_size_threshold: usize,

    /// Lists with more entries than this force node-list representation.
    #[arg(long, default_value_t = 512)]
    pub entries_threshold: usize,

    /// Increase verbosity (repeatable).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all but error output.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Run the multi-client blocking-pop demo instead of the REPL.
    #[arg(long)]
    pub demo: bool,

    /// Run this single command line instead of reading stdin.
    #[arg(long)]
    pub command: Option<String>,
}

impl Cli {
    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            string_size_threshold: self.string_size_threshold,
            entry_count_threshold: self.entries_threshold,
        }
    }

    pub fn resolved_display_level(&self) -> u32 {
        if self.quiet {
            0
        } else {
            (2 + self.verbose as u32).min(4)
        }
    }
}
