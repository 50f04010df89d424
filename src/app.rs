use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use chrono::Local;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    constants::{DURATION_LIMITS, ENCOURAGEMENTS, TIME_SETTINGS},
    particles::ParticleScene,
    storage,
    timer::{FocusTimer, HistoryEntry, SessionKind, SessionOutcome, TimerEvent},
};

mod event_handlers;
mod prompt_modal_view;
mod render_views;
mod time_format;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputMode {
    Normal,
    EditMinutes,
    EditTask,
    EditNotes,
    ConfirmQuit,
}

#[derive(Clone, Debug)]
pub struct UiOptions {
    pub minutes: Option<u64>,
    pub task: Option<String>,
    pub ambient: bool,
    pub splash: bool,
    pub break_after: Option<u64>,
    pub fresh: bool,
}

struct App {
    timer: FocusTimer,
    scene: ParticleScene,
    options: UiOptions,
    input_mode: InputMode,
    input_buffer: String,
    message: String,
    encouragement: String,
    session_live: bool,
    last_activity: Instant,
    idle_dimmed: bool,
    render_needed: bool,
}

impl App {
    fn new(width: u16, height: u16, options: UiOptions) -> Self {
        let mut timer = FocusTimer::new();
        let session_path = storage::get_session_path();

        if options.fresh {
            let _ = storage::delete_file_if_exists(&session_path);
        }

        match storage::load_session(&session_path) {
            Some(saved) => timer.apply_loaded_state(
                saved.time_left,
                saved.duration_minutes,
                saved.task,
                saved.notes,
            ),
            None => {
                let _ = timer.set_duration_minutes(DURATION_LIMITS.default_minutes);
            }
        }

        if let Some(minutes) = options.minutes {
            // an explicit flag wins over whatever the snapshot held
            let _ = timer.set_duration_minutes(minutes);
        }
        if let Some(task) = &options.task {
            timer.task_label = task.clone();
        }

        Self {
            timer,
            scene: ParticleScene::new(width, height),
            options,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            message: String::new(),
            encouragement: String::new(),
            session_live: false,
            last_activity: Instant::now(),
            idle_dimmed: false,
            render_needed: true,
        }
    }

    fn apply_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Started { kind } => {
                if self.timer.remaining_seconds > 0 {
                    self.session_live = true;
                }
                match kind {
                    SessionKind::Focus => {
                        self.message = "Focus mode on".to_string();
                        self.encouragement = pick_encouragement();
                    }
                    SessionKind::Break => {
                        self.message = "Break time".to_string();
                    }
                }
                self.persist();
            }
            TimerEvent::Ticked { .. } => {
                self.persist();
            }
            TimerEvent::Completed { kind } => {
                if self.session_live {
                    self.record_session(
                        kind,
                        SessionOutcome::Completed,
                        self.timer.duration_seconds,
                    );
                    self.session_live = false;
                }
                ring_bell();
                match kind {
                    SessionKind::Focus => {
                        self.message = "Session complete".to_string();
                        self.encouragement = pick_encouragement();
                        if self.options.ambient {
                            self.scene.spawn_confetti();
                        }
                        if let Some(minutes) = self.options.break_after
                            && let Some(event) = self.timer.begin_break(minutes)
                        {
                            self.apply_timer_event(event);
                            return;
                        }
                    }
                    SessionKind::Break => {
                        let _ = self.timer.reset();
                        self.message = "Break over".to_string();
                        self.encouragement.clear();
                    }
                }
                self.persist();
            }
            TimerEvent::Paused => {
                self.message = "Paused".to_string();
                self.persist();
            }
            TimerEvent::PausedByFocusLoss => {
                self.message = "Paused when you switched away".to_string();
                self.persist();
            }
            TimerEvent::Reset => {
                self.message.clear();
                self.encouragement.clear();
                self.scene.clear_confetti();
                self.persist();
            }
            TimerEvent::DurationChanged { .. } => {
                self.persist();
            }
        }

        self.render_needed = true;
    }

    fn persist(&self) {
        let _ = storage::save_session(&storage::get_session_path(), &self.timer);
    }

    fn record_session(&self, kind: SessionKind, outcome: SessionOutcome, elapsed_seconds: u64) {
        if elapsed_seconds == 0 {
            return;
        }

        let now = Local::now();
        let entry = HistoryEntry {
            date: now.format("%Y-%m-%d").to_string(),
            end_time: now.format("%H:%M:%S").to_string(),
            kind,
            task: self.timer.task_label.clone(),
            planned_minutes: self.timer.duration_seconds / 60,
            elapsed_seconds,
            outcome,
        };
        let _ = storage::append_history(&storage::get_history_path(), &entry);
    }

    fn refresh_idle(&mut self) {
        let idle = !self.timer.is_running()
            && self.last_activity.elapsed() >= Duration::from_millis(TIME_SETTINGS.idle_ms);
        if idle != self.idle_dimmed {
            self.idle_dimmed = idle;
            self.render_needed = true;
        }
    }
}

fn pick_encouragement() -> String {
    let mut rng = rand::thread_rng();
    ENCOURAGEMENTS[rng.gen_range(0..ENCOURAGEMENTS.len())].to_string()
}

fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

pub fn run_ui(options: UiOptions) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height, options);

    if app.options.splash {
        show_splash(&mut terminal)?;
    }

    let tick_rate = Duration::from_millis(TIME_SETTINGS.tick_ms);
    let physics_rate = Duration::from_millis(TIME_SETTINGS.physics_ms);
    let render_rate = Duration::from_millis(1000 / TIME_SETTINGS.target_fps);
    let save_rate = Duration::from_millis(TIME_SETTINGS.autosave_ms);
    let encourage_rate = Duration::from_millis(TIME_SETTINGS.encourage_ms);
    let mut last_tick = Instant::now();
    let mut last_physics = Instant::now();
    let mut last_render = Instant::now();
    let mut last_save = Instant::now();
    let mut last_encourage = Instant::now();

    loop {
        if last_tick.elapsed() >= tick_rate {
            if let Some(event) = app.timer.tick() {
                app.apply_timer_event(event);
            }
            last_tick = Instant::now();
        }

        if last_physics.elapsed() >= physics_rate {
            if app.options.ambient {
                app.scene.update();
                app.render_needed = true;
            }
            app.refresh_idle();
            last_physics = Instant::now();
        }

        if last_save.elapsed() >= save_rate {
            app.persist();
            last_save = Instant::now();
        }

        if last_encourage.elapsed() >= encourage_rate {
            if app.timer.is_running() {
                app.encouragement = pick_encouragement();
                app.render_needed = true;
            }
            last_encourage = Instant::now();
        }

        if last_render.elapsed() >= render_rate && app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
            last_render = Instant::now();
        }

        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::FocusLost => app.focus_lost(),
                Event::FocusGained => app.focus_gained(),
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }

    app.persist();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn show_splash(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    terminal.draw(|f| {
        render_views::draw_splash(f);
    })?;

    let shown_at = Instant::now();
    while shown_at.elapsed() < Duration::from_millis(TIME_SETTINGS.splash_ms) {
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(_) = event::read()?
        {
            break;
        }
    }

    Ok(())
}
