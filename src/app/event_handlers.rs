use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};

use crate::timer::{SessionKind, SessionOutcome, TimerPhase};

use super::{App, InputMode, time_format};

impl App {
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.last_activity = Instant::now();
        self.render_needed = true;

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditMinutes => {
                self.handle_minutes_key(key);
                false
            }
            InputMode::EditTask | InputMode::EditNotes => {
                self.handle_text_key(key);
                false
            }
            InputMode::ConfirmQuit => self.handle_quit_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                if self.timer.is_running() {
                    self.input_mode = InputMode::ConfirmQuit;
                    false
                } else {
                    true
                }
            }
            KeyCode::Char(' ') => {
                if self.timer.is_running() {
                    self.pause_timer();
                } else {
                    self.start_timer();
                }
                false
            }
            KeyCode::Char('s') => {
                self.start_timer();
                false
            }
            KeyCode::Char('p') => {
                self.pause_timer();
                false
            }
            KeyCode::Char('r') => {
                self.reset_timer();
                false
            }
            KeyCode::Char('b') => {
                self.start_break();
                false
            }
            KeyCode::Char('m') => {
                self.open_minutes_prompt();
                false
            }
            KeyCode::Char('t') => {
                self.open_task_prompt();
                false
            }
            KeyCode::Char('n') => {
                self.open_notes_prompt();
                false
            }
            KeyCode::Up => {
                self.nudge_minutes(1);
                false
            }
            KeyCode::Down => {
                self.nudge_minutes(-1);
                false
            }
            _ => false,
        }
    }

    fn handle_minutes_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_prompt(),
            KeyCode::Enter => {
                let minutes = time_format::parse_minutes(&self.input_buffer);
                if let Some(event) = self.timer.set_duration_minutes(minutes) {
                    self.apply_timer_event(event);
                }
                self.close_prompt();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() && self.input_buffer.len() < 3 {
                    self.input_buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_prompt(),
            KeyCode::Enter => {
                let value = self.input_buffer.clone();
                if self.input_mode == InputMode::EditTask {
                    self.timer.task_label = value;
                } else {
                    self.timer.notes = value;
                }
                self.persist();
                self.close_prompt();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    fn handle_quit_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                false
            }
            _ => false,
        }
    }

    fn start_timer(&mut self) {
        if let Some(event) = self.timer.start() {
            self.apply_timer_event(event);
        }
    }

    fn pause_timer(&mut self) {
        if let Some(event) = self.timer.pause() {
            self.apply_timer_event(event);
        }
    }

    fn reset_timer(&mut self) {
        if self.timer.phase != TimerPhase::Complete {
            let elapsed = self
                .timer
                .duration_seconds
                .saturating_sub(self.timer.remaining_seconds);
            self.record_session(self.timer.kind, SessionOutcome::Abandoned, elapsed);
        }
        if let Some(event) = self.timer.reset() {
            self.apply_timer_event(event);
        }
    }

    fn start_break(&mut self) {
        if self.timer.is_running() {
            return;
        }

        if self.timer.phase != TimerPhase::Complete && self.timer.kind == SessionKind::Focus {
            let elapsed = self
                .timer
                .duration_seconds
                .saturating_sub(self.timer.remaining_seconds);
            self.record_session(SessionKind::Focus, SessionOutcome::Abandoned, elapsed);
        }

        let minutes = self.options.break_after.unwrap_or(5);
        if let Some(event) = self.timer.begin_break(minutes) {
            self.apply_timer_event(event);
        }
    }

    fn nudge_minutes(&mut self, delta: i64) {
        let current = self.timer.configured_minutes;
        let next = if delta < 0 {
            current.saturating_sub(1)
        } else {
            current + 1
        };
        if let Some(event) = self.timer.set_duration_minutes(next) {
            self.apply_timer_event(event);
        }
    }

    fn open_minutes_prompt(&mut self) {
        self.input_buffer = self.timer.configured_minutes.to_string();
        self.input_mode = InputMode::EditMinutes;
    }

    fn open_task_prompt(&mut self) {
        self.input_buffer = self.timer.task_label.clone();
        self.input_mode = InputMode::EditTask;
    }

    fn open_notes_prompt(&mut self) {
        self.input_buffer = self.timer.notes.clone();
        self.input_mode = InputMode::EditNotes;
    }

    fn close_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub(super) fn focus_lost(&mut self) {
        if let Some(event) = self.timer.on_focus_lost() {
            self.apply_timer_event(event);
        }
    }

    pub(super) fn focus_gained(&mut self) {
        self.last_activity = Instant::now();
        self.render_needed = true;
    }
}
