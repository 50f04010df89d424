use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::{App, InputMode, view_style};

impl App {
    pub(super) fn render_prompt(&self, f: &mut Frame, terminal_size: Rect) {
        let area = prompt_rect(terminal_size);

        let title = match self.input_mode {
            InputMode::EditMinutes => "minutes (1-180)",
            InputMode::EditTask => "task",
            _ => "notes",
        };

        let line = Line::from(vec![
            Span::raw(self.input_buffer.clone()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Line::from(Span::styled(
                    title,
                    Style::default().fg(Color::White),
                )))
                .title_alignment(Alignment::Center)
                .border_style(
                    Style::default().fg(view_style::accent_color(self.timer.progress())),
                ),
        );

        f.render_widget(ratatui::widgets::Clear, area);
        f.render_widget(paragraph, area);
    }

    pub(super) fn render_quit_confirm(&self, f: &mut Frame, terminal_size: Rect) {
        let area = prompt_rect(terminal_size);

        let paragraph = Paragraph::new(Line::from("Quit while the timer is running? (y/n)"))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Line::from(Span::styled(
                        "still running",
                        Style::default().fg(Color::White),
                    )))
                    .title_alignment(Alignment::Center)
                    .border_style(
                        Style::default().fg(view_style::border_color(self.timer.progress())),
                    ),
            );

        f.render_widget(ratatui::widgets::Clear, area);
        f.render_widget(paragraph, area);
    }
}

fn prompt_rect(terminal_size: Rect) -> Rect {
    let width = (terminal_size.width / 2)
        .max(24)
        .min(terminal_size.width.saturating_sub(2))
        .max(1);
    let height = 3.min(terminal_size.height).max(1);
    let x = (terminal_size.width.saturating_sub(width)) / 2;
    let y = (terminal_size.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
