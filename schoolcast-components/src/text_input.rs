//! Labelled single-line form field

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use schoolcast_dispatch_core::{Component, EventKind};

/// Props for TextInput component
pub struct TextInputProps<'a, A> {
    /// Current field value, owned by the form state
    pub value: &'a str,
    /// Shown in the top border
    pub label: &'a str,
    /// Shown dimmed while the value is empty
    pub placeholder: &'a str,
    pub is_focused: bool,
    /// Render `•` for every character (passwords)
    pub masked: bool,
    /// Inline validation message shown in the bottom border
    pub error: Option<&'a str>,
    /// Called with the new value after each edit
    pub on_change: fn(String) -> A,
    /// Called on Enter
    pub on_submit: fn(String) -> A,
}

/// A bordered text field with a cursor.
///
/// The value lives in the store; the component only tracks the cursor and
/// emits `on_change` with the edited value.
#[derive(Default)]
pub struct TextInput {
    /// Cursor position in characters
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the cursor after the last character of `value`.
    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = value.chars().count();
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.chars().count());
    }

    fn byte_offset(value: &str, chars: usize) -> usize {
        value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(value.len())
    }

    fn insert_char(&mut self, value: &str, c: char) -> String {
        let at = Self::byte_offset(value, self.cursor);
        let mut new_value = String::with_capacity(value.len() + c.len_utf8());
        new_value.push_str(&value[..at]);
        new_value.push(c);
        new_value.push_str(&value[at..]);
        self.cursor += 1;
        new_value
    }

    fn delete_before(&mut self, value: &str) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        let start = Self::byte_offset(value, self.cursor - 1);
        let end = Self::byte_offset(value, self.cursor);
        self.cursor -= 1;
        Some(format!("{}{}", &value[..start], &value[end..]))
    }

    fn delete_at(&self, value: &str) -> Option<String> {
        if self.cursor >= value.chars().count() {
            return None;
        }
        let start = Self::byte_offset(value, self.cursor);
        let end = Self::byte_offset(value, self.cursor + 1);
        Some(format!("{}{}", &value[..start], &value[end..]))
    }
}

impl<A> Component<A> for TextInput {
    type Props<'a> = TextInputProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused {
            return None;
        }
        self.clamp_cursor(props.value);

        let EventKind::Key(key) = event else {
            return None;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.move_to_end(props.value);
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some((props.on_change)(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some((props.on_change)(self.insert_char(props.value, c))),
            KeyCode::Backspace => self.delete_before(props.value).map(props.on_change),
            KeyCode::Delete => self.delete_at(props.value).map(props.on_change),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(props.value.chars().count());
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.move_to_end(props.value);
                None
            }
            KeyCode::Enter => Some((props.on_submit)(props.value.to_string())),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.clamp_cursor(props.value);

        let (text, style) = if props.value.is_empty() {
            (
                props.placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else if props.masked {
            ("•".repeat(props.value.chars().count()), Style::default())
        } else {
            (props.value.to_string(), Style::default())
        };

        let border = match (props.error.is_some(), props.is_focused) {
            (true, _) => Style::default().fg(Color::Red),
            (false, true) => Style::default().fg(Color::Cyan),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", props.label));
        if let Some(error) = props.error {
            block = block.title_bottom(Line::styled(
                format!(" {} ", error),
                Style::default().fg(Color::Red),
            ));
        }

        frame.render_widget(Paragraph::new(text).style(style).block(block), area);

        if props.is_focused && area.width > 2 && area.height > 2 {
            let cursor_x = area.x + 1 + self.cursor as u16;
            if cursor_x < area.x + area.width - 1 {
                frame.set_cursor_position((cursor_x, area.y + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_dispatch_core::testing::{key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Change(String),
        Submit(String),
    }

    fn props(value: &str, is_focused: bool) -> TextInputProps<'_, TestAction> {
        TextInputProps {
            value,
            label: "Email",
            placeholder: "name@school.org",
            is_focused,
            masked: false,
            error: None,
            on_change: TestAction::Change,
            on_submit: TestAction::Submit,
        }
    }

    fn press(input: &mut TextInput, k: &str, value: &str) -> Vec<TestAction> {
        input
            .handle_event(&EventKind::Key(key(k)), props(value, true))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_typing_appends_at_cursor() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, "a", ""), vec![TestAction::Change("a".into())]);

        input.move_to_end("ann");
        assert_eq!(
            press(&mut input, "@", "ann"),
            vec![TestAction::Change("ann@".into())]
        );
    }

    #[test]
    fn test_backspace_handles_multibyte() {
        let mut input = TextInput::new();
        input.move_to_end("école");
        assert_eq!(
            press(&mut input, "backspace", "école"),
            vec![TestAction::Change("écol".into())]
        );

        input.cursor = 1;
        assert_eq!(
            press(&mut input, "backspace", "école"),
            vec![TestAction::Change("cole".into())]
        );
        assert_eq!(input.cursor, 0);
        assert!(press(&mut input, "backspace", "cole").is_empty());
    }

    #[test]
    fn test_delete_and_clear() {
        let mut input = TextInput::new();
        assert_eq!(
            press(&mut input, "delete", "abc"),
            vec![TestAction::Change("bc".into())]
        );
        assert_eq!(
            press(&mut input, "ctrl+u", "abc"),
            vec![TestAction::Change(String::new())]
        );
    }

    #[test]
    fn test_submit() {
        let mut input = TextInput::new();
        assert_eq!(
            press(&mut input, "enter", "hello"),
            vec![TestAction::Submit("hello".into())]
        );
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut input = TextInput::new();
        let actions: Vec<_> = input
            .handle_event(&EventKind::Key(key("a")), props("", false))
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_render_label_and_placeholder() {
        let mut render = RenderHarness::new(30, 3);
        let mut input = TextInput::new();

        let output = render.render_to_string_plain(|frame| {
            input.render(frame, frame.area(), props("", true));
        });

        assert!(output.contains("Email"));
        assert!(output.contains("name@school.org"));
    }

    #[test]
    fn test_render_masked_with_error() {
        let mut render = RenderHarness::new(40, 3);
        let mut input = TextInput::new();

        let output = render.render_to_string_plain(|frame| {
            let props = TextInputProps {
                masked: true,
                label: "Password",
                error: Some("Password must be at least 6 characters"),
                ..props("abc", false)
            };
            input.render(frame, frame.area(), props);
        });

        assert!(output.contains("•••"));
        assert!(!output.contains("abc"));
        assert!(output.contains("at least 6"));
    }
}
