//! hivecheck CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`hivecheck_engine`] (sessions and the leaderboard) and
//! [`hivecheck_tui`] (rendering and key mapping), providing RAII-based
//! terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> LeaderboardStore::open -> command
//!              play/tutorial: TerminalSession::new() -> run_session() -> record -> summary
//!              leaderboard/reset: plain stdout
//!           -> LeaderboardStore::shutdown
//! ```
//!
//! # Event Loop
//!
//! A current-thread runtime multiplexes two timers:
//!
//! 1. Frame tick (~60 FPS): drain input, advance animations, render
//! 2. Countdown tick (1 s): decrement the timed test's clock
//!
//! Decisions are scored inside the frame tick that completes them, so a
//! countdown tick never races a pending score.

mod assets;
mod board;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdin, stdout},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hivecheck_engine::{
    FileStorage, HiveConfig, KeyValueStorage, LeaderboardStore, MemoryStorage, ReviewerName,
    SessionEvent, Session, SessionOutcome, load_deck,
};
use hivecheck_tui::{
    Glyphs, InputPump, Palette, PointerDriver, draw_leaderboard, draw_session, draw_summary,
    glyphs, handle_events,
};

use crate::board::{LeaderboardView, confirm_reset, format_table};
use crate::cli::{Cli, Commands};

const FRAME_DURATION: Duration = Duration::from_millis(16);
const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
const FEEDBACK_DURATION: Duration = Duration::from_millis(1400);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let candidates = log_file_candidates();
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.hivecheck/logs/hivecheck.log
    if let Some(config_path) = HiveConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("hivecheck.log"));
    }

    // Fallback: ./.hivecheck/logs/hivecheck.log (useful in constrained environments)
    candidates.push(PathBuf::from(".hivecheck").join("logs").join("hivecheck.log"));

    candidates
}

fn load_config(path: Option<&Path>) -> HiveConfig {
    let loaded = match path {
        Some(path) => HiveConfig::load_from(path),
        None => HiveConfig::load(),
    };
    match loaded {
        Ok(Some(config)) => config,
        Ok(None) => HiveConfig::default(),
        Err(e) => {
            tracing::warn!(path = %e.path().display(), "Using default config: {e}");
            HiveConfig::default()
        }
    }
}

fn open_storage(ephemeral: bool, config: &HiveConfig) -> Arc<dyn KeyValueStorage> {
    if ephemeral {
        tracing::info!("Using in-memory leaderboard storage");
        return Arc::new(MemoryStorage::new());
    }
    let dir = config
        .data_dir()
        .unwrap_or_else(|| PathBuf::from(".hivecheck").join("data"));
    tracing::info!(dir = %dir.display(), "Using file leaderboard storage");
    Arc::new(FileStorage::new(dir))
}

/// Owns the terminal for the lifetime of an interactive command.
///
/// Dropping it restores the terminal, so early returns and `?` still leave
/// the shell usable.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

struct Theme {
    palette: Palette,
    glyphs: Glyphs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref());
    let theme = Theme {
        palette: Palette::standard(),
        glyphs: glyphs(cli.ascii),
    };
    let store = Arc::new(LeaderboardStore::open(open_storage(cli.ephemeral, &config)).await);

    let result = match cli.command {
        Commands::Play { name, deck } => play(&store, &config, &theme, &name, deck.as_deref()).await,
        Commands::Tutorial { name } => tutorial(&config, &theme, name.as_deref()).await,
        Commands::Leaderboard => {
            print!("{}", format_table(&store.leaderboard()));
            Ok(())
        }
        Commands::Reset { yes } => reset(&store, yes).await,
    };

    if let Err(e) = store.flush().await {
        eprintln!("Failed to save leaderboard: {e}");
    }
    store.shutdown().await;

    result
}

async fn play(
    store: &Arc<LeaderboardStore>,
    config: &HiveConfig,
    theme: &Theme,
    name: &str,
    deck: Option<&Path>,
) -> Result<()> {
    let reviewer = ReviewerName::new(name).context("--name must not be blank")?;
    let items = match deck {
        Some(path) => load_deck(path)?,
        None => assets::sample_deck().context("built-in deck is invalid")?,
    };
    let mut session = Session::timed(
        reviewer.clone(),
        config.session_secs(),
        config.gesture_config(),
        items,
    );

    let view = LeaderboardView::attach(store);
    let mut terminal = TerminalSession::new()?;
    let mut input = InputPump::new();

    let result = async {
        let outcome = run_session(&mut terminal.terminal, &mut session, &mut input, theme).await?;
        let score = session.score();
        if let Some(SessionOutcome::Scored(result)) = outcome {
            let recorded = store.record_result(&result);
            tracing::debug!(?recorded, "Test result absorbed");
        }

        let best = store.get(reviewer.as_str());
        terminal
            .terminal
            .draw(|f| draw_summary(f, "Test complete", score, best.as_ref(), &theme.palette))?;
        input.next_key().await?;

        let rows = view.rows();
        terminal.terminal.draw(|f| {
            draw_leaderboard(f, &rows, Some(reviewer.as_str()), &theme.palette);
        })?;
        input.next_key().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;

    input.shutdown().await;
    result
}

async fn tutorial(config: &HiveConfig, theme: &Theme, name: Option<&str>) -> Result<()> {
    let mut session = Session::tutorial(config.gesture_config(), assets::tutorial_slides());
    let mut terminal = TerminalSession::new()?;
    let mut input = InputPump::new();

    let result = async {
        run_session(&mut terminal.terminal, &mut session, &mut input, theme).await?;
        let title = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => format!("Tutorial complete, {name}!"),
            None => "Tutorial complete".to_string(),
        };
        let score = session.score();
        terminal
            .terminal
            .draw(|f| draw_summary(f, &title, score, None, &theme.palette))?;
        input.next_key().await?;
        Ok::<(), anyhow::Error>(())
    }
    .await;

    input.shutdown().await;
    result
}

async fn reset(store: &LeaderboardStore, yes: bool) -> Result<()> {
    if !yes
        && !confirm_reset(stdin().lock(), stdout()).context("failed to read confirmation")?
    {
        println!("Leaderboard left unchanged.");
        return Ok(());
    }
    store.reset();
    store
        .flush()
        .await
        .context("leaderboard cleared in memory but not on disk")?;
    println!("Leaderboard cleared.");
    Ok(())
}

/// Drive one session until it ends. Returns the session's outcome.
async fn run_session<B>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    input: &mut InputPump,
    theme: &Theme,
) -> Result<Option<SessionOutcome>>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut driver = PointerDriver::new();
    let mut frames = interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut countdown = interval_at(Instant::now() + COUNTDOWN_PERIOD, COUNTDOWN_PERIOD);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_frame = Instant::now();
    let mut feedback_shown_at: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = frames.tick() => {
                if handle_events(session, &mut driver, input)? {
                    return Ok(session.stop());
                }

                let now = Instant::now();
                let events = session.advance(now.duration_since(last_frame));
                last_frame = now;
                if events.iter().any(|e| matches!(e, SessionEvent::Feedback(_))) {
                    feedback_shown_at = Some(now);
                }
                if let Some(shown) = feedback_shown_at
                    && now.duration_since(shown) >= FEEDBACK_DURATION
                {
                    session.clear_feedback();
                    feedback_shown_at = None;
                }

                terminal.draw(|f| draw_session(f, session, &theme.palette, &theme.glyphs))?;
            }
            _ = countdown.tick() => {
                if let Some(outcome) = session.countdown_tick() {
                    return Ok(Some(outcome));
                }
            }
        }
    }
}
