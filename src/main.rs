// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use gemchat_config::Config;
use gemchat_core::{
    ChatSession, ConversationStore, FileStorage, KeyValueStorage, MemoryStorage, Theme,
    ThemePreference, Thread,
};
use gemchat_model::AnswerProvider;
use gemchat_tui::{App, AppOptions};

const LOG_FILE: &str = "gemchat.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let mut config = gemchat_config::load(cli.config.as_deref())?;
    if cli.no_reveal {
        config.reveal.enabled = false;
    }

    let tui = cli.command.is_none() && !cli.is_headless();
    let log_file = tui.then(|| config.storage.resolve_dir().join(LOG_FILE));
    init_logging(cli.verbose, log_file.as_deref());

    match &cli.command {
        Some(Commands::ShowConfig) => {
            let yaml = serde_yaml::to_string(&config).context("serializing config")?;
            println!("{yaml}");
            return Ok(());
        }
        Some(Commands::Chats { limit }) => {
            let storage = open_storage(&cli, &config);
            return print_chats(storage.as_ref(), &config, *limit);
        }
        Some(Commands::Completions { .. }) | None => {}
    }

    let storage = open_storage(&cli, &config);
    let store = ConversationStore::load(storage.clone(), config.storage.history_key.clone());
    let provider: Arc<dyn AnswerProvider> = Arc::from(gemchat_model::from_config(&config.endpoint)?);
    debug!(provider = provider.name(), threads = store.threads().len(), "session ready");
    let session = ChatSession::new(store, provider, config.reveal.clone());

    if tui {
        run_tui(cli, &config, storage, session).await
    } else {
        run_headless(cli, session).await
    }
}

fn open_storage(cli: &Cli, config: &Config) -> Arc<dyn KeyValueStorage> {
    if cli.ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        Arc::new(FileStorage::new(config.storage.resolve_dir()))
    }
}

/// List stored threads without creating the greeting thread on an empty store.
fn print_chats(storage: &dyn KeyValueStorage, config: &Config, limit: usize) -> anyhow::Result<()> {
    let key = &config.storage.history_key;
    let raw = storage
        .get(key)
        .with_context(|| format!("reading saved chats under {key:?}"))?;
    let mut threads: Vec<Thread> = match raw {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("parsing saved chats under {key:?}"))?,
        None => Vec::new(),
    };

    if threads.is_empty() {
        println!("No chats yet.");
        return Ok(());
    }

    threads.sort_by(|a, b| b.id.cmp(&a.id));
    println!("{:<14}  {:<16}  {:>5}  TITLE", "ID", "CREATED", "MSGS");
    for t in threads.iter().take(limit) {
        let created = chrono::DateTime::from_timestamp_millis(t.id)
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<14}  {:<16}  {:>5}  {}", t.id, created, t.messages.len(), t.title());
    }
    println!("\nTotal: {} chat(s)", threads.len());
    if let Some(dir) = storage_dir(config) {
        println!("Storage dir: {}", dir.display());
    }
    Ok(())
}

fn storage_dir(config: &Config) -> Option<PathBuf> {
    let dir = config.storage.resolve_dir();
    dir.exists().then_some(dir)
}

/// Ask one question and write the answer to stdout.
async fn run_headless(cli: Cli, mut session: ChatSession) -> anyhow::Result<()> {
    let question = match cli.prompt {
        Some(p) => p,
        None if !cli::is_stdin_tty() => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
        None => String::new(),
    };
    if question.trim().is_empty() {
        bail!("no question given: pass PROMPT or pipe it on stdin");
    }

    if cli.new || session.store().current_id().is_none() {
        session.store_mut().create();
    }

    let mut stdout = io::stdout();
    let answer = session
        .send(&question, |chunk| {
            let _ = stdout.write_all(chunk.as_bytes());
            let _ = stdout.flush();
        })
        .await;
    if answer.is_none() {
        bail!("question was rejected");
    }
    println!();
    Ok(())
}

async fn run_tui(
    cli: Cli,
    config: &Config,
    storage: Arc<dyn KeyValueStorage>,
    session: ChatSession,
) -> anyhow::Result<()> {
    use ratatui::crossterm::{
        event::{DisableBracketedPaste, EnableBracketedPaste},
        execute,
    };

    let fallback = config.tui.theme.parse::<Theme>().unwrap_or_else(|e| {
        warn!("ignoring configured theme: {e}");
        Theme::default()
    });
    let theme = ThemePreference::load(storage, config.storage.theme_key.clone(), fallback);

    let ascii = config.tui.ascii_borders
        || std::env::var("GEMCHAT_ASCII_BORDERS").is_ok_and(|v| v == "1");
    let opts = AppOptions { initial_prompt: cli.prompt, ascii };

    let terminal = ratatui::init();
    let _ = execute!(io::stdout(), EnableBracketedPaste);

    let app = App::new(session, theme, opts);
    let result = app.run(terminal).await;

    let _ = execute!(io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

/// Logs go to `log_file` when given (the TUI owns the terminal), else stderr.
fn init_logging(verbosity: u8, log_file: Option<&Path>) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let Some(path) = log_file else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
        return;
    };
    match open_log(path) {
        Ok(file) => registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init(),
        Err(_) => registry.with(fmt::layer().with_writer(io::sink)).init(),
    }
}

fn open_log(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
