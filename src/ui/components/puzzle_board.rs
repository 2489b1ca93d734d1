use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::puzzle::{PuzzleSession, Slot};
use crate::ui::theme::{Theme, ThemeColors};

/// The word being played, with its definition underneath when visible.
pub struct PuzzleBoard<'a> {
    pub session: Option<&'a PuzzleSession>,
    pub placeholder: char,
    pub title: String,
    pub definition: Option<&'a str>,
    pub empty_text: String,
    pub theme: &'a Theme,
}

impl<'a> PuzzleBoard<'a> {
    pub fn new(session: Option<&'a PuzzleSession>, placeholder: char, theme: &'a Theme) -> Self {
        Self {
            session,
            placeholder,
            title: String::new(),
            definition: None,
            empty_text: String::new(),
            theme,
        }
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    pub fn definition(mut self, definition: Option<&'a str>) -> Self {
        self.definition = definition;
        self
    }

    pub fn empty_text(mut self, text: String) -> Self {
        self.empty_text = text;
        self
    }
}

impl Widget for PuzzleBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let Some(session) = self.session else {
            Paragraph::new(Line::from(Span::styled(
                self.empty_text,
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
            return;
        };

        Paragraph::new(Line::from(word_spans(session, self.placeholder, colors)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        if let Some(definition) = self.definition {
            Paragraph::new(Line::from(Span::styled(
                definition,
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::ITALIC),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);
        }
    }
}

/// Space-separated glyphs, styled by whether each one is still concealed.
fn word_spans<'a>(session: &PuzzleSession, placeholder: char, colors: &ThemeColors) -> Vec<Span<'a>> {
    let revealed = Style::default()
        .fg(colors.text_revealed())
        .add_modifier(Modifier::BOLD);
    let hidden = Style::default().fg(colors.text_hidden());
    let shuffled = Style::default()
        .fg(colors.accent())
        .add_modifier(Modifier::BOLD);

    let glyphs: Vec<(char, Style)> = match session {
        PuzzleSession::Flashcard(p) => p
            .slots()
            .iter()
            .map(|slot| match *slot {
                Slot::Shown(ch) => (ch, revealed),
                Slot::Hidden => (placeholder, hidden),
            })
            .collect(),
        PuzzleSession::Scramble(p) => {
            let style = if p.is_revealed() { revealed } else { shuffled };
            p.display().iter().map(|&ch| (ch, style)).collect()
        }
    };

    let mut spans = Vec::with_capacity(glyphs.len() * 2);
    for (i, (ch, style)) in glyphs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(ch.to_string(), style));
    }
    spans
}
