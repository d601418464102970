// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gemchat",
    about = "A terminal chat client for Google Gemini",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Question to send right away
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Run headless (no TUI); the answer is written to stdout
    #[arg(long, short = 'H')]
    pub headless: bool,

    /// Headless: ask in a fresh thread instead of the current one
    #[arg(long)]
    pub new: bool,

    /// Show answers at once instead of revealing them piece by piece
    #[arg(long)]
    pub no_reveal: bool,

    /// Keep threads and theme in memory only; nothing is read or written
    #[arg(long)]
    pub ephemeral: bool,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// List saved chats, newest first
    Chats {
        /// Maximum number of chats to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },
}

impl Cli {
    /// Headless is triggered by --headless or when stdin is not a terminal.
    pub fn is_headless(&self) -> bool {
        self.headless || !is_stdin_tty()
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "gemchat", &mut std::io::stdout());
}

pub fn is_stdin_tty() -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        unsafe { libc::isatty(std::io::stdin().as_raw_fd()) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_headless_flags() {
        let cli = Cli::try_parse_from(["gemchat", "--headless", "--new", "--no-reveal", "Hi"]).unwrap();
        assert!(cli.headless && cli.new && cli.no_reveal);
        assert_eq!(cli.prompt.as_deref(), Some("Hi"));
    }

    #[test]
    fn parses_chats_limit() {
        let cli = Cli::try_parse_from(["gemchat", "chats", "-n", "5"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Chats { limit: 5 })));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["gemchat", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
