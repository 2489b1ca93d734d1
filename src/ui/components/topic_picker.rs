use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::app::{PickerFocus, TopicPicker};
use crate::lexicon::Lexicon;
use crate::ui::theme::Theme;

/// Two-column theme / subtheme chooser.
pub struct TopicPickerView<'a> {
    pub lexicon: &'a Lexicon,
    pub picker: &'a TopicPicker,
    pub theme: &'a Theme,
}

impl<'a> TopicPickerView<'a> {
    pub fn new(lexicon: &'a Lexicon, picker: &'a TopicPicker, theme: &'a Theme) -> Self {
        Self {
            lexicon,
            picker,
            theme,
        }
    }

    fn render_column(
        &self,
        title: &str,
        items: Vec<(String, String)>,
        selected: usize,
        focused: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(if focused {
                colors.border_focused()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = items
            .into_iter()
            .enumerate()
            .map(|(i, (label, detail))| {
                let is_selected = i == selected;
                let indicator = if is_selected { ">" } else { " " };
                Line::from(vec![
                    Span::styled(
                        format!(" {indicator} {label}"),
                        Style::default()
                            .fg(if is_selected {
                                colors.accent()
                            } else {
                                colors.fg()
                            })
                            .add_modifier(if is_selected && focused {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                    ),
                    Span::styled(format!("  {detail}"), Style::default().fg(colors.text_muted())),
                ])
            })
            .collect();

        // Keep the selection on screen for long lists.
        let height = inner.height as usize;
        let skip = (selected + 1).saturating_sub(height);
        Paragraph::new(lines)
            .scroll((skip as u16, 0))
            .render(inner, buf);
    }
}

impl Widget for &TopicPickerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(Span::styled(
                self.lexicon.name.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("picker.subtitle", count = self.lexicon.word_count()).to_string(),
                Style::default().fg(colors.text_muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);

        let topics = self.lexicon.topics();
        let topic_items = topics
            .iter()
            .map(|topic| {
                (
                    topic.name.clone(),
                    t!("picker.subtopic_count", count = topic.subtopics.len()).to_string(),
                )
            })
            .collect();
        self.render_column(
            &t!("picker.topics"),
            topic_items,
            self.picker.topic,
            self.picker.focus == PickerFocus::Topics,
            columns[0],
            buf,
        );

        let subtopic_items = topics
            .get(self.picker.topic)
            .map(|topic| {
                topic
                    .subtopics
                    .iter()
                    .map(|sub| {
                        (
                            sub.name.clone(),
                            t!("picker.word_count", count = sub.words.len()).to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.render_column(
            &t!("picker.subtopics"),
            subtopic_items,
            self.picker.subtopic,
            self.picker.focus == PickerFocus::Subtopics,
            columns[1],
            buf,
        );
    }
}
