mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use lingo::{
    config::{Config, ConfigStore, FileConfigStore},
    dictionary::{BundledDictionary, DictionaryError, WordValidity},
    runtime::{spawn_terminal_reader, ChannelEventSource, DictionaryWorker, FixedTicker, GameEvent, Runner},
    session::{GameSession, Phase, SubmitOutcome, TickOutcome},
    stats::{format_history, GameDb, GameRecord},
    words::{Difficulty, WordBank},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::{mpsc, Arc},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
// interstitial between rounds, in ticks (~2 seconds)
const ROUND_OVER_TICKS: u8 = 20;

/// timed five-round word-guessing game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess five hidden words of increasing length, six attempts and thirty seconds per try. Per-letter feedback after every guess, one hint per round, and a score that rewards quick wins."
)]
pub struct Cli {
    /// difficulty of the five-word sequence (defaults to the saved config)
    #[clap(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seconds allowed per attempt
    #[clap(short = 's', long)]
    round_seconds: Option<u64>,

    /// disable the one-per-round hint
    #[clap(long)]
    no_hints: bool,

    /// print recent results and exit
    #[clap(long)]
    history: bool,

    /// export the whole history as CSV to PATH and exit
    #[clap(long, value_name = "PATH")]
    export_history: Option<PathBuf>,
}

pub struct App {
    pub session: GameSession,
    pub input: String,
    pub status: Option<String>,
    pub checking: bool,
    pub hints_enabled: bool,
    pub best_score: Option<u32>,
    db: Option<GameDb>,
    transition_ticks: Option<u8>,
    recorded: bool,
}

impl App {
    pub fn new(session: GameSession, hints_enabled: bool, db: Option<GameDb>) -> Self {
        let mut app = Self {
            session,
            input: String::new(),
            status: None,
            checking: false,
            hints_enabled,
            best_score: None,
            db,
            transition_ticks: None,
            recorded: false,
        };
        app.reset_input();
        app
    }

    /// The guess buffer always starts with the fixed first letter.
    fn reset_input(&mut self) {
        self.input.clear();
        if let Some(word) = self.session.current_word() {
            if let Some(first) = word.chars().next() {
                self.input.push(first);
            }
        }
    }

    fn on_tick(&mut self) {
        if let Some(ticks) = self.transition_ticks {
            if ticks <= 1 {
                self.transition_ticks = None;
                self.session.advance_round();
                self.status = None;
                self.reset_input();
            } else {
                self.transition_ticks = Some(ticks - 1);
            }
            return;
        }

        if let Some(TickOutcome::RoundTimedOut) = self.session.on_tick() {
            let word = self
                .session
                .current_word()
                .unwrap_or_default()
                .to_uppercase();
            self.status = Some(format!("time's up! the word was {word}"));
            self.checking = false;
            self.after_round_end();
        }
    }

    fn on_verdict(
        &mut self,
        generation: u64,
        verdict: Result<WordValidity, DictionaryError>,
    ) {
        self.checking = false;
        match self.session.resolve_check(generation, verdict) {
            Ok(SubmitOutcome::Stale) => {}
            Ok(SubmitOutcome::Continue { .. }) => {
                self.status = None;
                self.reset_input();
            }
            Ok(SubmitOutcome::RoundWon { awarded, .. }) => {
                self.status = Some(format!("round won! +{awarded} points"));
                self.after_round_end();
            }
            Ok(SubmitOutcome::RoundLost { .. }) => {
                let word = self
                    .session
                    .current_word()
                    .unwrap_or_default()
                    .to_uppercase();
                self.status = Some(format!("out of tries! the word was {word}"));
                self.after_round_end();
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn after_round_end(&mut self) {
        match self.session.phase() {
            Phase::RoundOver { .. } => self.transition_ticks = Some(ROUND_OVER_TICKS),
            Phase::Finished { won } => self.record_result(won),
            _ => {}
        }
    }

    fn record_result(&mut self, won: bool) {
        if self.recorded {
            return;
        }
        self.recorded = true;

        let difficulty = self
            .session
            .difficulty()
            .map(|d| d.to_string())
            .unwrap_or_default();
        if let Some(db) = &self.db {
            let _ = db.record(&GameRecord {
                played_at: Local::now(),
                difficulty: difficulty.clone(),
                score: self.session.score(),
                rounds_won: self.session.rounds_won(),
                won,
            });
            self.best_score = db.best_score(&difficulty).ok().flatten();
        }
    }

    fn restart(&mut self) {
        let difficulty = self.session.difficulty().unwrap_or(Difficulty::Easy);
        if let Err(e) = self.session.start(difficulty) {
            self.status = Some(e.to_string());
            return;
        }
        self.status = None;
        self.checking = false;
        self.recorded = false;
        self.transition_ticks = None;
        self.reset_input();
    }

    fn request_hint(&mut self) {
        if !self.hints_enabled {
            self.status = Some("hints are disabled".to_string());
            return;
        }
        match self.session.request_hint() {
            Ok((pos, letter)) => {
                self.status = Some(format!(
                    "hint: letter {} is {}",
                    pos + 1,
                    letter.to_ascii_uppercase()
                ));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn submit(&mut self, worker: &DictionaryWorker) {
        match self.session.submit(&self.input) {
            Ok(check) => {
                self.checking = true;
                worker.request(check);
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Handle a keypress; `true` means quit.
    fn on_key(&mut self, key: KeyEvent, worker: &DictionaryWorker) -> bool {
        if key.code == KeyCode::Esc {
            return true;
        }

        match self.session.phase() {
            Phase::Finished { .. } => match key.code {
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('t') => self.share(),
                _ => {}
            },
            _ if self.session.is_paused() => {
                if key.code == KeyCode::Char(' ') {
                    self.session.resume();
                }
            }
            Phase::RoundOver { .. } => {
                // skip the interstitial
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.transition_ticks = None;
                    self.session.advance_round();
                    self.status = None;
                    self.reset_input();
                }
            }
            Phase::Playing => match key.code {
                KeyCode::Char(' ') => self.session.pause(),
                KeyCode::Char('?') => self.request_hint(),
                KeyCode::Enter => self.submit(worker),
                KeyCode::Backspace => {
                    // the first letter is fixed
                    if self.input.chars().count() > 1 {
                        self.input.pop();
                    }
                }
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    let limit = self.session.current_word().map_or(0, str::len);
                    if self.input.chars().count() < limit {
                        self.input.push(c.to_ascii_lowercase());
                    }
                }
                _ => {}
            },
            Phase::NotStarted => {}
        }
        false
    }

    fn share(&self) {
        let difficulty = self.session.difficulty().unwrap_or(Difficulty::Easy);
        let _ = webbrowser::open(&format!(
            "https://twitter.com/intent/tweet?text=I%20scored%20{}%20points%20playing%20lingo%20on%20{}%20difficulty",
            self.session.score(),
            difficulty
        ));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.history {
        return print_history();
    }
    if let Some(path) = &cli.export_history {
        let db = GameDb::new()?;
        let count = db.export_csv(path)?;
        println!("exported {count} games to {}", path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = store.load();
    let difficulty = cli.difficulty.unwrap_or_else(|| {
        Difficulty::from_str(&cfg.difficulty, true).unwrap_or(Difficulty::Easy)
    });
    let hints_enabled = cfg.hints_enabled && !cli.no_hints;
    let _ = store.save(&Config {
        difficulty: difficulty.to_string(),
        round_seconds: cli.round_seconds.or(cfg.round_seconds),
        hints_enabled: cfg.hints_enabled,
    });

    let bank = WordBank::bundled()?;
    let mut session = GameSession::new(bank);
    if let Some(secs) = cli.round_seconds.or(cfg.round_seconds) {
        session.set_round_seconds(secs);
    }
    session.start(difficulty)?;

    let mut app = App::new(session, hints_enabled, GameDb::new().ok());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let (tx, rx) = mpsc::channel::<GameEvent>();
    spawn_terminal_reader(tx.clone());
    let worker = DictionaryWorker::spawn(tx, Arc::new(BundledDictionary::new()));

    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Verdict {
                generation,
                verdict,
            } => app.on_verdict(generation, verdict),
            GameEvent::Key(key) => {
                if app.on_key(key, &worker) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn print_history() -> Result<(), Box<dyn Error>> {
    let db = GameDb::new()?;
    let records = db.recent(20)?;
    if records.is_empty() {
        println!("no games recorded yet");
        return Ok(());
    }
    for line in format_history(&records, Local::now()) {
        println!("{line}");
    }
    Ok(())
}
