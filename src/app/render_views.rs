use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    constants::BRAILLE_GRID,
    timer::{SessionKind, TimerPhase},
};

use super::{App, InputMode, time_format, view_style};

impl App {
    pub(super) fn draw_frame(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(size);
        let stage = chunks[0];

        let inner_width = stage.width.saturating_sub(2);
        let inner_height = stage.height.saturating_sub(2);

        if self.scene.width != inner_width * BRAILLE_GRID.dot_width as u16
            || self.scene.height != inner_height * BRAILLE_GRID.dot_height as u16
        {
            self.scene.resize(inner_width, inner_height);
        }

        let content = if self.options.ambient {
            self.scene.render()
        } else {
            Vec::new()
        };

        let progress = self.timer.progress();
        let border_color = view_style::border_color(progress);
        let accent_color = view_style::accent_color(progress);

        let title = if self.timer.task_label.is_empty() {
            "lumen".to_string()
        } else {
            self.timer.task_label.clone()
        };
        let title_style = if self.idle_dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Line::from(Span::styled(title, title_style)).alignment(Alignment::Left))
            .title(
                Line::from(Span::styled(
                    time_format::format_clock(self.timer.remaining_seconds),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title(
                Line::from(Span::styled(
                    self.phase_label(),
                    Style::default().fg(accent_color),
                ))
                .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(border_color));
        let paragraph = Paragraph::new(content).block(block);
        f.render_widget(paragraph, stage);

        let message = Paragraph::new(Line::from(Span::styled(
            self.message.clone(),
            Style::default().fg(accent_color),
        )))
        .alignment(Alignment::Center);
        f.render_widget(message, chunks[1]);

        let encouragement = Paragraph::new(Line::from(Span::styled(
            self.encouragement.clone(),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center);
        f.render_widget(encouragement, chunks[2]);

        match self.input_mode {
            InputMode::EditMinutes | InputMode::EditTask | InputMode::EditNotes => {
                self.render_prompt(f, size);
            }
            InputMode::ConfirmQuit => self.render_quit_confirm(f, size),
            InputMode::Normal => {}
        }
    }

    fn phase_label(&self) -> String {
        let word = match (self.timer.phase, self.timer.kind) {
            (TimerPhase::Running, SessionKind::Break) => "break",
            (TimerPhase::Running, SessionKind::Focus) => "focus",
            (TimerPhase::Complete, _) => "done",
            (TimerPhase::Idle, _) => "idle",
        };
        format!("{} {}m", word, self.timer.configured_minutes)
    }
}

pub(super) fn draw_splash(f: &mut Frame) {
    let size = f.size();
    let area = splash_rect(size);

    let lines = vec![
        Line::from(Span::styled(
            "lumen",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "a quiet focus timer",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from("space  start / pause"),
        Line::from("m  minutes   t  task"),
        Line::from("n  notes     b  break"),
        Line::from("r  reset     q  quit"),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(view_style::border_color(0.0))),
    );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(paragraph, area);
}

fn splash_rect(terminal_size: Rect) -> Rect {
    let width = 36.min(terminal_size.width.saturating_sub(2)).max(1);
    let height = 9.min(terminal_size.height.saturating_sub(2)).max(1);
    let x = (terminal_size.width.saturating_sub(width)) / 2;
    let y = (terminal_size.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
