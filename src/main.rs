mod app;
mod components;
mod config;
mod error;
mod event;
mod explorer;
mod handler;
mod theme;
mod tui;
mod ui;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::layout::Rect;
use tracing::Level;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, TreeConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::explorer::menu::{directory_menu, ContextMenu};
use crate::explorer::source::FsSource;
use crate::theme::resolve_theme;
use crate::tui::{install_panic_hook, Tui};
use crate::watch::FsWatcher;

/// A terminal-based project explorer panel.
#[derive(Parser, Debug)]
#[command(name = "px", version, about)]
struct Cli {
    /// Project root to display (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable filesystem watcher (auto-refresh)
    #[arg(long)]
    no_watcher: bool,

    /// Show hidden files
    #[arg(long)]
    hidden: bool,

    /// Disable nerd-font icons (ASCII fallback)
    #[arg(long)]
    no_icons: bool,

    /// Append logs to this file (the TUI screen stays clean)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Partial config derived from CLI flags; merged on top of files.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.hidden.then_some(true),
                ..Default::default()
            },
            tree: TreeConfig {
                use_icons: self.no_icons.then_some(false),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Write logs to the `--log-file` if one was given; otherwise logging is off.
fn setup_tracing(cli: &Cli) -> error::Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let level = match cli.log_level.as_str() {
        "error" => Level::ERROR,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::WARN,
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli)?;

    let overrides = cli.overrides();
    let config = AppConfig::load(cli.config.as_deref(), Some(&overrides));

    // The positional path wins; the config default only fills in for ".".
    let start_path = if cli.path == PathBuf::from(".") {
        config
            .general
            .default_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or(cli.path.clone())
    } else {
        cli.path.clone()
    };
    let path = start_path.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", start_path.display()))
    })?;

    install_panic_hook();

    let mut tui = Tui::new()?;
    let source = FsSource::new(path.clone(), config.show_hidden());
    let mut app = App::new(
        source,
        ContextMenu::new(directory_menu()),
        resolve_theme(&config.theme),
        config.use_icons(),
    );
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();

    // Both loads run concurrently; the tree is ready once the pair lands.
    app.start_initial_load(&event_tx);

    let _watcher = if config.watcher_enabled() {
        let ignore_patterns: Vec<String> = watch::DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .collect();
        match FsWatcher::new(
            &path,
            Duration::from_millis(config.debounce_ms()),
            ignore_patterns,
            watch::DEFAULT_FLOOD_THRESHOLD,
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("filesystem watcher unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        let size = tui.terminal_mut().size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key, &event_tx),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse, area, &event_tx),
            Event::Tick => {}
            Event::Resize(_, _) => {}
            Event::ProjectLoaded { snapshot, name } => app.handle_project_loaded(snapshot, name),
            Event::SnapshotReloaded(snapshot) => app.handle_snapshot_reloaded(snapshot),
            Event::ConfirmDecision {
                action,
                target,
                accepted,
            } => app.handle_confirm_decision(action, target, accepted),
            Event::FsChange(paths) => {
                tracing::debug!("{} changed paths; refreshing snapshot", paths.len());
                if app.ready {
                    app.request_refresh(&event_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    app.teardown();
    tui.restore()?;
    Ok(())
}
