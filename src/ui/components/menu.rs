use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    pub fn new(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Bordered selection list built fresh each frame; the selected index lives
/// in the app state.
pub struct SelectMenu<'a> {
    title: &'a str,
    hint: &'a str,
    items: &'a [MenuItem],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> SelectMenu<'a> {
    pub fn new(
        title: &'a str,
        hint: &'a str,
        items: &'a [MenuItem],
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            hint,
            items,
            selected,
            theme,
        }
    }
}

impl Widget for SelectMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            self.title,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let row_height = if self.items.iter().any(|i| !i.description.is_empty()) {
            3
        } else {
            1
        };
        let item_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(row_height))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(
                " {indicator} [{key}] {label}",
                key = item.key,
                label = item.label
            );
            let mut lines = vec![Line::from(Span::styled(
                label_text,
                Style::default()
                    .fg(if is_selected {
                        colors.accent()
                    } else {
                        colors.fg()
                    })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ))];
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(colors.text_pending()),
                )));
            }

            if i < item_layout.len() {
                Paragraph::new(lines).render(item_layout[i], buf);
            }
        }

        let hint = Paragraph::new(Line::from(Span::styled(
            self.hint,
            Style::default().fg(colors.text_pending()),
        )))
        .alignment(Alignment::Center);
        hint.render(layout[2], buf);
    }
}
