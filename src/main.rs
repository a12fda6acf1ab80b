use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use sprintype::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    language::Language,
    logging,
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::TestDuration,
    theme::Theme,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};

/// minimal timed typing test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal timed typing test: type the words before the countdown runs out and get wpm, accuracy and a per-second chart."
)]
pub struct Cli {
    /// test length in seconds
    #[clap(short = 'd', long, value_enum)]
    duration: Option<TestDuration>,

    /// language to pull words from
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// colour theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<Theme>,
}

impl Cli {
    /// Stored preferences with command line overrides applied.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = AppDirs::state_dir().and_then(|dir| logging::init(&dir));

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    tracing::info!(
        target: "app",
        duration = config.duration.secs(),
        language = %config.language,
        theme = %config.theme,
        "startup"
    );
    let mut app = App::new(config, Box::new(store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(target: "app", %err, "tui_failed");
    }
    res
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let event = runner.step();
        if app.handle_event(event, Instant::now()) == Flow::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
