//! Component trait for view elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A view element that renders from props and turns input into actions.
///
/// Props carry everything read from the store (a slice, a validation error
/// map, focus). `handle_event` returns actions instead of mutating anything;
/// only transient UI state such as a cursor or scroll offset lives in
/// `&mut self`.
///
/// ```ignore
/// impl Component<Action> for AdminTable {
///     type Props<'a> = AdminTableProps<'a>;
///
///     fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>)
///         -> impl IntoIterator<Item = Action>
///     {
///         match event {
///             EventKind::Key(key) if key.code == KeyCode::Char('n') => {
///                 Some(Action::Admins(ResourceAction::GoToPage(props.slice.filters.page + 1)))
///             }
///             _ => None,
///         }
///     }
///
///     fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
///         // ...
///     }
/// }
/// ```
pub trait Component<A> {
    /// Read-only data required to render
    type Props<'a>;

    /// Map an input event to zero or more actions.
    ///
    /// Render-only components keep the default, which emits nothing.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        None::<A>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
