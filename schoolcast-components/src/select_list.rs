//! Bordered selection list used for the sidebar and pickers

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use schoolcast_dispatch_core::{Component, EventKind};

/// Props for SelectList component
pub struct SelectListProps<'a, A> {
    pub items: &'a [&'a str],
    /// Highlighted row
    pub highlighted: usize,
    /// Row marked as the current choice (the open page, the chosen school)
    pub active: Option<usize>,
    pub title: &'a str,
    pub is_focused: bool,
    /// Called when the highlight moves
    pub on_highlight: fn(usize) -> A,
    /// Called on Enter
    pub on_select: fn(usize) -> A,
}

/// A scrollable list navigated with j/k or the arrow keys.
#[derive(Default)]
pub struct SelectList {
    scroll_offset: usize,
}

impl SelectList {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_visible(&mut self, selected: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + viewport_height {
            self.scroll_offset = selected + 1 - viewport_height;
        }
    }
}

impl<A> Component<A> for SelectList {
    type Props<'a> = SelectListProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.items.is_empty() {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        let last = props.items.len() - 1;
        let target = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (props.highlighted + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => props.highlighted.saturating_sub(1),
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::Enter => return Some((props.on_select)(props.highlighted.min(last))),
            _ => return None,
        };

        (target != props.highlighted).then(|| (props.on_highlight)(target))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let viewport_height = area.height.saturating_sub(2) as usize;
        self.ensure_visible(props.highlighted, viewport_height);

        let items: Vec<ListItem> = props
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = if props.active == Some(i) { "▸ " } else { "  " };
                let style = if props.active == Some(i) {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::raw(format!("{}{}", marker, item))).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", props.title))
                    .border_style(if props.is_focused {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    }),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let selected = (!props.items.is_empty()).then_some(props.highlighted);
        let mut state = ListState::default().with_selected(selected);
        *state.offset_mut() = self.scroll_offset;

        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_dispatch_core::testing::{key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Highlight(usize),
        Select(usize),
    }

    const ITEMS: &[&str] = &["Dashboard", "Admins", "Schools"];

    fn props(highlighted: usize, is_focused: bool) -> SelectListProps<'static, TestAction> {
        SelectListProps {
            items: ITEMS,
            highlighted,
            active: None,
            title: "Menu",
            is_focused,
            on_highlight: TestAction::Highlight,
            on_select: TestAction::Select,
        }
    }

    fn press(list: &mut SelectList, k: &str, props: SelectListProps<'_, TestAction>) -> Vec<TestAction> {
        list.handle_event(&EventKind::Key(key(k)), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_navigation() {
        let mut list = SelectList::new();
        assert_eq!(press(&mut list, "j", props(0, true)), vec![TestAction::Highlight(1)]);
        assert_eq!(press(&mut list, "up", props(2, true)), vec![TestAction::Highlight(1)]);
        assert_eq!(press(&mut list, "end", props(0, true)), vec![TestAction::Highlight(2)]);
    }

    #[test]
    fn test_navigation_at_bounds() {
        let mut list = SelectList::new();
        assert!(press(&mut list, "k", props(0, true)).is_empty());
        assert!(press(&mut list, "j", props(2, true)).is_empty());
    }

    #[test]
    fn test_enter_selects_highlighted() {
        let mut list = SelectList::new();
        assert_eq!(press(&mut list, "enter", props(1, true)), vec![TestAction::Select(1)]);
    }

    #[test]
    fn test_unfocused_or_empty_ignores() {
        let mut list = SelectList::new();
        assert!(press(&mut list, "j", props(0, false)).is_empty());

        let empty = SelectListProps {
            items: &[],
            ..props(0, true)
        };
        assert!(press(&mut list, "enter", empty).is_empty());
    }

    #[test]
    fn test_render_marks_active() {
        let mut render = RenderHarness::new(24, 6);
        let mut list = SelectList::new();

        let output = render.render_to_string_plain(|frame| {
            let props = SelectListProps {
                active: Some(1),
                ..props(0, true)
            };
            list.render(frame, frame.area(), props);
        });

        assert!(output.contains("Menu"));
        assert!(output.contains("▸ Admins"));
        assert!(output.contains("  Schools"));
    }
}
