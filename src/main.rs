use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use racer::assets::Assets;
use racer::build_info;
use racer::config::GameConfig;
use racer::constants::{CONFIG_FILE, HIGH_SCORE_FILE, LOG_FILE};
use racer::game::high_score::{HighScoreFile, HighScoreStore};
use racer::game::spawn::LanePolicy;
use racer::game::{FrameReport, RaceSession};
use racer::input::KeyTracker;
use racer::ui::render_race_scene;
use racer::utils::persistence::data_path_or_local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser, Debug)]
#[command(name = "racer", version)]
#[command(about = "Top-down lane racing in the terminal")]
struct Cli {
    /// JSON config file (default: ~/.racer/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// High score file (default: ~/.racer/highscore.txt)
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Seed for deterministic traffic
    #[arg(long)]
    seed: Option<u64>,

    /// How NPC spawn lanes are chosen
    #[arg(long, value_enum)]
    lane_policy: Option<LanePolicy>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Log file (default: ~/.racer/racer.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// CLI flags take precedence over the config file.
    fn apply(&self, config: &mut GameConfig) {
        if let Some(path) = &self.high_score_file {
            config.high_score_path = Some(path.clone());
        }
        if let Some(policy) = self.lane_policy {
            config.lane_policy = policy;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_path_or_local(LOG_FILE));
    init_logging(&log_path);
    info!(version = %build_info::version_line(), "starting");

    let config = load_config(&cli)?;
    info!(
        fps = config.target_fps,
        lane_policy = config.lane_policy.name(),
        max_npcs = config.max_npcs,
        "config loaded"
    );

    let high_score_path = config
        .high_score_path
        .clone()
        .unwrap_or_else(|| data_path_or_local(HIGH_SCORE_FILE));
    let mut store = HighScoreFile::new(high_score_path);
    let high_score = store.load();
    info!(high_score, path = %store.path().display(), "high score loaded");

    let assets = Assets::load(&config);

    let mut rng = match cli.seed {
        Some(seed) => {
            info!(seed, "seeded traffic");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let frame_duration = config.frame_duration();
    let mut session = RaceSession::new(config, high_score);

    enable_raw_mode().context("failed to enable raw mode")?;
    let release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
    info!(release_events, "terminal ready");

    let result = run(
        release_events,
        &mut session,
        &assets,
        &mut rng,
        &mut store,
        frame_duration,
    );
    let restored = restore_terminal(release_events);

    result.context("game loop failed")?;
    restored.context("failed to restore terminal")?;

    info!(
        score = session.score.score,
        high_score = session.score.high_score,
        frames = session.frames_played,
        "exiting"
    );
    Ok(())
}

/// Log to a file; the terminal belongs to the renderer. If the file cannot be
/// opened, logs are discarded and the game still runs.
fn init_logging(path: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match open_log_file(path) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Defaults, then the config file, then CLI flags; validated once.
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_path_or_local(CONFIG_FILE));

    let mut config = GameConfig::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(
    release_events: bool,
    session: &mut RaceSession,
    assets: &Assets,
    rng: &mut StdRng,
    store: &mut HighScoreFile,
    frame_duration: Duration,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    if release_events {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    let mut tracker = KeyTracker::new(release_events);
    frame_loop(
        &mut terminal,
        session,
        assets,
        &mut tracker,
        rng,
        store,
        frame_duration,
    )
}

/// Fixed-rate loop: drain input, simulate one frame, draw, sleep out the
/// rest of the frame budget.
fn frame_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut RaceSession,
    assets: &Assets,
    tracker: &mut KeyTracker,
    rng: &mut StdRng,
    store: &mut HighScoreFile,
    frame_duration: Duration,
) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(input) = tracker.handle_key(key, Instant::now()) {
                    inputs.push(input);
                }
            }
        }
        let held = tracker.snapshot(Instant::now());

        let report = session.frame(&inputs, held, dt, rng, store);
        log_report(&report);
        if report.quit {
            info!(state = session.state.name(), "quit requested");
            return Ok(());
        }

        terminal.draw(|frame| {
            let area = frame.size();
            render_race_scene(frame, area, session, assets);
        })?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}

fn log_report(report: &FrameReport) {
    for id in &report.despawned {
        debug!(npc = id.0, "npc despawned");
    }
    if report.points_awarded > 0 {
        debug!(points = report.points_awarded, "npc passed");
    }
    if report.collided_with.is_some() && !report.high_score_saved {
        debug!("game over without a new high score");
    }
}

/// Undo every terminal mode change. Runs even when the loop failed.
fn restore_terminal(release_events: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if release_events {
        if let Err(e) = stdout.execute(PopKeyboardEnhancementFlags) {
            warn!(error = %e, "could not pop keyboard enhancement flags");
        }
    }
    stdout.execute(LeaveAlternateScreen)?;
    stdout.execute(crossterm::cursor::Show)?;
    disable_raw_mode()
}
