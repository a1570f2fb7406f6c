//! Test utilities for console views and reducers
//!
//! - [`key`]: build a `KeyEvent` from a string such as `"ctrl+p"`
//! - [`RenderHarness`]: render into an in-memory terminal and read it back
//! - [`TestHarness`]: state plus an action channel for effect handlers
//! - `assert_emitted!` and friends for checking emitted actions
//!
//! ```ignore
//! let mut render = RenderHarness::new(80, 20);
//! let output = render.render_to_string_plain(|frame| {
//!     table.render(frame, frame.area(), props);
//! });
//! assert!(output.contains("No admins found"));
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};
use tokio::sync::mpsc;

use crate::{Action, ActionCategory};

/// Parse a key description like `"q"`, `"enter"`, `"ctrl+u"`, `"shift+tab"`.
///
/// # Panics
///
/// Panics on an unknown key name; meant for tests only.
pub fn key(s: &str) -> KeyEvent {
    let mut modifiers = KeyModifiers::empty();
    let mut parts: Vec<&str> = s.split('+').collect();
    // "ctrl++" style strings end with an empty part for the literal '+'
    let last = if s.ends_with("++") || s == "+" {
        parts.retain(|p| !p.is_empty());
        "+"
    } else {
        parts.pop().unwrap_or_default()
    };

    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "" => {}
            other => panic!("Invalid key modifier: {:?}", other),
        }
    }

    let code = match last.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" if modifiers.contains(KeyModifiers::SHIFT) => {
            modifiers.remove(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        name if name.len() > 1 && name.starts_with('f') => match name[1..].parse::<u8>() {
            Ok(n) => KeyCode::F(n),
            Err(_) => panic!("Invalid key string: {:?}", s),
        },
        _ => {
            let mut chars = last.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => panic!("Invalid key string: {:?}", s),
            }
        }
    };

    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// A character key without modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::empty(),
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Every character of `text` as key events, for typing into inputs.
pub fn keys(text: &str) -> Vec<KeyEvent> {
    text.chars().map(char_key).collect()
}

/// Buffer contents as plain text, one line per row, trailing spaces trimmed.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.y..area.y + area.height {
        let mut line = String::new();
        for x in area.x..area.x + area.width {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// Renders views into a `TestBackend` terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
        Self { terminal }
    }

    /// Render one frame and return a copy of the resulting buffer.
    pub fn render<F>(&mut self, draw: F) -> Buffer
    where
        F: FnOnce(&mut Frame),
    {
        let completed = self.terminal.draw(draw).expect("test backend never fails");
        completed.buffer.clone()
    }

    /// Render one frame and return it as plain text.
    pub fn render_to_string_plain<F>(&mut self, draw: F) -> String
    where
        F: FnOnce(&mut Frame),
    {
        buffer_to_string_plain(&self.render(draw))
    }
}

/// State plus an action channel, for driving effect handlers in tests.
pub struct TestHarness<S, A: Action> {
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<A> {
        self.tx.clone()
    }

    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all actions emitted so far.
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Wait for the next emitted action.
    pub async fn next_emitted(&mut self) -> Option<A> {
        self.rx.recv().await
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, A: ActionCategory> TestHarness<S, A> {
    /// Drain only the actions of one category; the rest stay queued.
    pub fn drain_category(&mut self, category: &str) -> Vec<A> {
        let (matching, rest): (Vec<A>, Vec<A>) = self
            .drain_emitted()
            .into_iter()
            .partition(|a| a.category() == Some(category));
        for action in rest {
            let _ = self.tx.send(action);
        }
        matching
    }
}

/// Assert that an action matching the pattern was emitted.
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching the pattern was emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find the first action matching a pattern.
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_key_simple() {
        let k = key("q");
        assert_eq!(k.code, KeyCode::Char('q'));
        assert_eq!(k.modifiers, KeyModifiers::empty());
    }

    #[test]
    fn test_key_modifiers() {
        let k = key("ctrl+u");
        assert_eq!(k.code, KeyCode::Char('u'));
        assert!(k.modifiers.contains(KeyModifiers::CONTROL));

        let k = key("shift+tab");
        assert_eq!(k.code, KeyCode::BackTab);
        assert!(k.modifiers.is_empty());
    }

    #[test]
    fn test_key_named() {
        assert_eq!(key("esc").code, KeyCode::Esc);
        assert_eq!(key("enter").code, KeyCode::Enter);
        assert_eq!(key("backspace").code, KeyCode::Backspace);
        assert_eq!(key("f5").code, KeyCode::F(5));
        assert_eq!(key("space").code, KeyCode::Char(' '));
    }

    #[test]
    fn test_keys_types_text() {
        let typed: Vec<KeyCode> = keys("ab").into_iter().map(|k| k.code).collect();
        assert_eq!(typed, vec![KeyCode::Char('a'), KeyCode::Char('b')]);
    }

    #[test]
    fn test_render_harness() {
        let mut render = RenderHarness::new(20, 2);
        let output = render.render_to_string_plain(|frame| {
            frame.render_widget(Paragraph::new("hello"), frame.area());
        });
        assert_eq!(output, "hello\n");
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        AdminsFetch,
        Quit,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::AdminsFetch => "AdminsFetch",
                TestAction::Quit => "Quit",
            }
        }
    }

    impl ActionCategory for TestAction {
        fn category(&self) -> Option<&'static str> {
            match self {
                TestAction::AdminsFetch => Some("admins"),
                TestAction::Quit => None,
            }
        }
    }

    #[test]
    fn test_harness_drain_category() {
        let mut harness = TestHarness::<(), TestAction>::new(());
        harness.emit(TestAction::AdminsFetch);
        harness.emit(TestAction::Quit);

        assert_eq!(harness.drain_category("admins"), vec![TestAction::AdminsFetch]);
        assert_eq!(harness.drain_emitted(), vec![TestAction::Quit]);
    }

    #[test]
    fn test_assert_macros() {
        let actions = vec![TestAction::AdminsFetch];
        assert_emitted!(actions, TestAction::AdminsFetch);
        assert_not_emitted!(actions, TestAction::Quit);
        assert!(find_emitted!(actions, TestAction::AdminsFetch).is_some());
    }
}
