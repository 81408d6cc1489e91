use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use playground::{
    app::App,
    app_dirs::AppDirs,
    clock::MonotonicClock,
    config::{Config, ConfigStore, FileConfigStore},
    games::GameKind,
    playground::Playground,
    runtime::{CrosstermEventSource, FixedTicker, PlaygroundEvent, Runner},
    PlaygroundError,
};

/// terminal playground of timed mini-games
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Three timed mini-games in the terminal: click precision targets, test your reaction time, and repeat growing memory patterns."
)]
pub struct Cli {
    /// open this game directly instead of the menu
    #[clap(short = 'g', long, value_enum)]
    game: Option<GameKind>,

    /// seed for reproducible targets, delays and patterns
    #[clap(long)]
    seed: Option<u64>,

    /// length of a click-precision round in seconds
    #[clap(short = 's', long)]
    round_secs: Option<u32>,

    /// config file to use instead of the platform default
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// file to write the log to
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored config with command-line overrides applied on top.
    fn resolve_config(&self, stored: Config) -> Result<Config, PlaygroundError> {
        let mut config = stored;
        if let Some(secs) = self.round_secs {
            config.precision.round_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path.or_else(AppDirs::log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone())?;
    let config = cli.resolve_config(cli.config_store().load())?;
    let tick = Duration::from_millis(config.tick_rate_ms);

    let mut playground = Playground::new(MonotonicClock::new(), config);
    if let Some(seed) = cli.seed {
        playground = playground.with_seed(seed);
    }
    let mut app = App::new(playground);
    if let Some(kind) = cli.game {
        app.select(kind);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("playground started");
    let res = start_tui(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!("playground exited");

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    let size = terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        match runner.step() {
            PlaygroundEvent::Tick => {
                // redraw once more after a game stops so its final state shows
                let was_animating = app.is_animating();
                app.on_tick();
                if was_animating || app.is_animating() {
                    terminal.draw(|f| f.render_widget(&*app, f.area()))?;
                }
            }
            PlaygroundEvent::Resize => {
                let size = terminal.size()?;
                app.set_viewport(Rect::new(0, 0, size.width, size.height));
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            PlaygroundEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.on_key(key);
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            PlaygroundEvent::Mouse(mouse) => {
                app.on_mouse(mouse);
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}
