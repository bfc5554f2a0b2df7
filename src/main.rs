mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

use thirty::ping::{DesktopPingSink, NullPingSink, PingKind, PingSink};
use thirty::prefs::{FilePrefStore, PrefStore, Prefs};
use thirty::runtime::{CrosstermEventSource, Event, Runner};
use thirty::session::{PingUnit, Session, SessionConfig, SessionEvent};

const TICK_RATE_MS: u64 = 250;

/// tiny terminal set timer with awareness pings and a persistent set counter
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A tiny full-screen terminal timer for repeating work sets: counts a set down, pings you on a configurable cadence so you stay aware of the clock, tallies completed sets, and remembers your settings between runs."
)]
pub struct Cli {
    /// length of one work set in minutes
    #[clap(short = 'm', long)]
    set_minutes: Option<u32>,

    /// awareness-ping cadence magnitude
    #[clap(long)]
    ping_value: Option<u32>,

    /// awareness-ping cadence unit
    #[clap(long, value_enum)]
    ping_unit: Option<PingUnitArg>,

    /// playback gain for pings, 0-100
    #[clap(long)]
    volume: Option<u8>,

    /// disable pings and notifications entirely
    #[clap(long)]
    mute: bool,

    /// alternate preference file
    #[clap(long)]
    prefs: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum PingUnitArg {
    Off,
    Seconds,
    Minutes,
}

impl PingUnitArg {
    fn as_unit(&self) -> PingUnit {
        match self {
            PingUnitArg::Off => PingUnit::Off,
            PingUnitArg::Seconds => PingUnit::Seconds,
            PingUnitArg::Minutes => PingUnit::Minutes,
        }
    }
}

impl Cli {
    /// Lay CLI overrides over the loaded configuration. Returns whether
    /// anything changed, so the shell can persist like any settings change.
    fn apply_overrides(&self, config: &mut SessionConfig) -> bool {
        let before = config.clone();
        if let Some(m) = self.set_minutes {
            config.set_minutes = m.max(1);
        }
        if let Some(v) = self.ping_value {
            config.ping_value = v.max(1);
        }
        if let Some(u) = self.ping_unit {
            config.ping_unit = u.as_unit();
        }
        if let Some(v) = self.volume {
            config.volume = v.min(100);
        }
        *config != before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Timer,
    Settings,
    ConfirmNextSet,
    ConfirmResetSets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    SetMinutes,
    PingValue,
    PingUnit,
    Volume,
}

impl SettingsField {
    fn next(&self) -> Self {
        match self {
            SettingsField::SetMinutes => SettingsField::PingValue,
            SettingsField::PingValue => SettingsField::PingUnit,
            SettingsField::PingUnit => SettingsField::Volume,
            SettingsField::Volume => SettingsField::SetMinutes,
        }
    }

    fn prev(&self) -> Self {
        match self {
            SettingsField::SetMinutes => SettingsField::Volume,
            SettingsField::PingValue => SettingsField::SetMinutes,
            SettingsField::PingUnit => SettingsField::PingValue,
            SettingsField::Volume => SettingsField::PingUnit,
        }
    }
}

/// Spinner-style settings form. Numeric fields are edited as text buffers;
/// malformed input falls back to the previous valid value on apply.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub field: SettingsField,
    pub set_minutes: String,
    pub ping_value: String,
    pub ping_unit: PingUnit,
    pub volume: u8,
}

impl SettingsForm {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            field: SettingsField::SetMinutes,
            set_minutes: config.set_minutes.to_string(),
            ping_value: config.ping_value.to_string(),
            ping_unit: config.ping_unit,
            volume: config.volume,
        }
    }

    pub fn select_next(&mut self) {
        self.field = self.field.next();
    }

    pub fn select_prev(&mut self) {
        self.field = self.field.prev();
    }

    /// Step the active field up or down
    pub fn adjust(&mut self, up: bool) {
        match self.field {
            SettingsField::SetMinutes => step_buffer(&mut self.set_minutes, up),
            SettingsField::PingValue => step_buffer(&mut self.ping_value, up),
            SettingsField::PingUnit => {
                self.ping_unit = if up {
                    self.ping_unit.next()
                } else {
                    self.ping_unit.prev()
                };
            }
            SettingsField::Volume => {
                self.volume = if up {
                    (self.volume + 5).min(100)
                } else {
                    self.volume.saturating_sub(5)
                };
            }
        }
    }

    /// Typed digits go into the active numeric buffer
    pub fn type_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let buffer = match self.field {
            SettingsField::SetMinutes => &mut self.set_minutes,
            SettingsField::PingValue => &mut self.ping_value,
            _ => return,
        };
        if buffer.len() < 4 {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            SettingsField::SetMinutes => {
                self.set_minutes.pop();
            }
            SettingsField::PingValue => {
                self.ping_value.pop();
            }
            _ => {}
        }
    }

    /// Build the config to apply, keeping each previous value where the
    /// typed input does not parse.
    pub fn to_config(&self, previous: &SessionConfig) -> SessionConfig {
        SessionConfig {
            set_minutes: self
                .set_minutes
                .trim()
                .parse()
                .unwrap_or(previous.set_minutes),
            ping_value: self.ping_value.trim().parse().unwrap_or(previous.ping_value),
            ping_unit: self.ping_unit,
            volume: self.volume,
        }
        .sanitized()
    }
}

fn step_buffer(buffer: &mut String, up: bool) {
    let current: u32 = buffer.trim().parse().unwrap_or(1);
    let stepped = if up {
        current.saturating_add(1).min(9999)
    } else {
        current.saturating_sub(1).max(1)
    };
    *buffer = stepped.to_string();
}

pub struct App {
    pub session: Session,
    pub state: AppState,
    pub settings: SettingsForm,
    store: FilePrefStore,
    sink: Box<dyn PingSink>,
    next_advance: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, store: FilePrefStore, sink: Box<dyn PingSink>) -> Self {
        let settings = SettingsForm::from_config(session.config());
        Self {
            session,
            state: AppState::Timer,
            settings,
            store,
            sink,
            next_advance: None,
            should_quit: false,
        }
    }

    /// Best-effort flush of config and counter; never surfaces a failure
    pub fn persist(&self) {
        let prefs = Prefs::from_session(self.session.config(), self.session.sets_done());
        let _ = self.store.save(&prefs);
    }

    fn arm_clock(&mut self) {
        self.next_advance = Some(Instant::now() + Duration::from_secs(1));
    }

    fn disarm_clock(&mut self) {
        self.next_advance = None;
    }

    fn toggle(&mut self) {
        self.session.toggle();
        if self.session.is_running() {
            self.arm_clock();
        } else {
            self.disarm_clock();
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.disarm_clock();
    }

    /// Advance once for every whole second that has passed the deadline, so
    /// the countdown tracks the wall clock even when ticks arrive late.
    pub fn on_tick(&mut self, now: Instant) {
        while let Some(due) = self.next_advance {
            if now < due {
                break;
            }
            self.next_advance = Some(due + Duration::from_secs(1));
            for event in self.session.advance() {
                match event {
                    SessionEvent::Ping => {
                        self.sink
                            .play(PingKind::Awareness, self.session.config().volume);
                    }
                    SessionEvent::Completed => {
                        self.disarm_clock();
                        self.persist();
                        self.sink
                            .play(PingKind::Completion, self.session.config().volume);
                        self.state = AppState::ConfirmNextSet;
                    }
                }
            }
            if self.next_advance.is_none() {
                break;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.state {
            AppState::Timer => self.on_timer_key(key),
            AppState::Settings => self.on_settings_key(key),
            AppState::ConfirmNextSet => self.on_confirm_next_set_key(key),
            AppState::ConfirmResetSets => self.on_confirm_reset_sets_key(key),
        }
    }

    fn on_timer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if self.session.increment_sets() {
                    self.persist();
                }
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                if self.session.decrement_sets() {
                    self.persist();
                }
            }
            KeyCode::Char('0') => {
                self.state = AppState::ConfirmResetSets;
            }
            KeyCode::Char('s') => {
                self.settings = SettingsForm::from_config(self.session.config());
                self.state = AppState::Settings;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.settings.select_prev(),
            KeyCode::Down => self.settings.select_next(),
            KeyCode::Left => self.settings.adjust(false),
            KeyCode::Right => self.settings.adjust(true),
            KeyCode::Backspace => self.settings.backspace(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.settings.type_char(c),
            KeyCode::Enter => {
                let new_config = self.settings.to_config(self.session.config());
                self.session.apply_settings(new_config);
                self.disarm_clock();
                self.persist();
                self.state = AppState::Timer;
            }
            KeyCode::Esc => {
                self.state = AppState::Timer;
            }
            _ => {}
        }
    }

    fn on_confirm_next_set_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.session.begin_next_set();
                self.arm_clock();
                self.state = AppState::Timer;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                // Declined: the clock stays parked at zero until the user acts
                self.state = AppState::Timer;
            }
            _ => {}
        }
    }

    fn on_confirm_reset_sets_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.session.reset_sets();
                self.persist();
                self.state = AppState::Timer;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.state = AppState::Timer;
            }
            _ => {}
        }
    }

    fn quit(&mut self) {
        self.persist();
        self.should_quit = true;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = match &cli.prefs {
        Some(path) => FilePrefStore::with_path(path),
        None => FilePrefStore::new(),
    };

    let prefs = store.load();
    let mut config = prefs.config();
    let overridden = cli.apply_overrides(&mut config);
    let session = Session::new(config, prefs.sets_done);

    let sink: Box<dyn PingSink> = if cli.mute {
        Box::new(NullPingSink::new())
    } else {
        Box::new(DesktopPingSink)
    };

    let mut app = App::new(session, store, sink);
    if overridden {
        app.persist();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Final flush on the way out, whatever path got us here
    app.persist();

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            Event::Tick => app.on_tick(Instant::now()),
            Event::Resize => {}
            Event::Key(key) => app.on_key(key),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
