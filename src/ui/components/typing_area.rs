use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::SessionState;
use crate::ui::theme::Theme;

/// How one prompt slot is painted. Typed slots compare the buffer against
/// the prompt (a repaired slot therefore shows as correct), the slot at the
/// buffer boundary carries the cursor, everything beyond is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotDisplay {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

pub fn slot_display(session: &SessionState, idx: usize) -> SlotDisplay {
    if idx < session.input.len() {
        if session.input[idx] == session.prompt[idx] {
            SlotDisplay::Correct
        } else {
            SlotDisplay::Incorrect
        }
    } else if idx == session.input.len() && !session.is_finished() {
        SlotDisplay::Cursor
    } else {
        SlotDisplay::Pending
    }
}

pub struct TypingArea<'a> {
    session: &'a SessionState,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a SessionState, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = self
            .session
            .prompt
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                let style = match slot_display(self.session, i) {
                    SlotDisplay::Correct => Style::default().fg(colors.text_correct()),
                    SlotDisplay::Incorrect => Style::default()
                        .fg(colors.text_incorrect())
                        .add_modifier(Modifier::UNDERLINED),
                    SlotDisplay::Cursor => Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg())
                        .add_modifier(Modifier::BOLD),
                    SlotDisplay::Pending => Style::default().fg(colors.text_pending()),
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::prompt::Mode;
    use crate::session::input::process_char;

    use super::*;

    fn session(prompt: &str) -> SessionState {
        let mut state = SessionState::new(Mode::Normal, Duration::from_secs(30));
        state.install_prompt(prompt);
        state
    }

    #[test]
    fn untyped_prompt_shows_cursor_then_pending() {
        let state = session("ab");
        assert_eq!(slot_display(&state, 0), SlotDisplay::Cursor);
        assert_eq!(slot_display(&state, 1), SlotDisplay::Pending);
    }

    #[test]
    fn typed_slots_reflect_buffer_comparison() {
        let mut state = session("abc");
        process_char(&mut state, 'a');
        process_char(&mut state, 'x');
        assert_eq!(slot_display(&state, 0), SlotDisplay::Correct);
        assert_eq!(slot_display(&state, 1), SlotDisplay::Incorrect);
        assert_eq!(slot_display(&state, 2), SlotDisplay::Cursor);
    }

    #[test]
    fn repaired_slot_renders_as_correct() {
        let mut state = session("ab");
        process_char(&mut state, 'x');
        process_char(&mut state, 'a');
        assert_eq!(slot_display(&state, 0), SlotDisplay::Correct);
        assert_eq!(slot_display(&state, 1), SlotDisplay::Cursor);
    }

    #[test]
    fn finished_session_has_no_cursor() {
        let mut state = session("ab");
        let start = std::time::Instant::now();
        state.started_at = Some(start);
        state.finish_if_due(start + Duration::from_secs(30));
        assert_eq!(slot_display(&state, 0), SlotDisplay::Pending);
    }
}
