//! Demo command-line front end.
//!
//! A `clap`-derived argument parser plus a line-oriented REPL that dispatches
//! directly to `commands.rs` against a single in-process `Database`. Not a
//! network server: it reads commands from stdin (or `--command`), one per
//! line, exactly as the spec's Non-goals require.

pub mod args;
pub mod repl;
