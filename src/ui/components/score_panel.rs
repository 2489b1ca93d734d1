use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::app::mode_label;
use crate::puzzle::Mode;
use crate::session::score::Score;
use crate::ui::theme::Theme;

/// Session tally plus the toggles that shape the current round.
pub struct ScorePanel<'a> {
    pub score: &'a Score,
    pub mode: Mode,
    pub auto_images: bool,
    pub timer_running: bool,
    pub auto_timer: bool,
    pub title: String,
    pub theme: &'a Theme,
}

impl<'a> ScorePanel<'a> {
    pub fn new(score: &'a Score, mode: Mode, theme: &'a Theme) -> Self {
        Self {
            score,
            mode,
            auto_images: false,
            timer_running: false,
            auto_timer: false,
            title: t!("stats.title").to_string(),
            theme,
        }
    }

    pub fn toggles(mut self, auto_images: bool, timer_running: bool, auto_timer: bool) -> Self {
        self.auto_images = auto_images;
        self.timer_running = timer_running;
        self.auto_timer = auto_timer;
        self
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = title;
        self
    }
}

impl Widget for ScorePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rate = self.score.success_rate();
        let rate_color = if self.score.attempts == 0 {
            colors.text_muted()
        } else if rate >= 75.0 {
            colors.success()
        } else if rate >= 50.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(colors.text_muted());
        let on_off = |on: bool| {
            if on {
                t!("common.on").to_string()
            } else {
                t!("common.off").to_string()
            }
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.score")), label),
                Span::styled(
                    format!("{} / {}", self.score.correct, self.score.attempts),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.success_rate")), label),
                Span::styled(
                    format!("{rate:.1}%"),
                    Style::default().fg(rate_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.hints")), label),
                Span::styled(self.score.hints.to_string(), muted),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.mode")), label),
                Span::styled(mode_label(self.mode), value),
            ]),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.auto_images")), label),
                Span::styled(on_off(self.auto_images), muted),
            ]),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.timer")), label),
                Span::styled(
                    if self.timer_running {
                        t!("stats.timer_running").to_string()
                    } else {
                        t!("stats.timer_stopped").to_string()
                    },
                    muted,
                ),
            ]),
            Line::from(vec![
                Span::styled(format!("  {} ", t!("stats.auto_timer")), label),
                Span::styled(on_off(self.auto_timer), muted),
            ]),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
