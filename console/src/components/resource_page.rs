use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};
use schoolcast_components::{Column, DataTable, DataTableProps, TextInput, TextInputProps};
use schoolcast_dispatch::{EventKind, Pagination, ResourceSlice};

use super::Component;
use crate::action::Action;
use crate::listing::Listing;
use crate::state::Focus;

/// Table-ready snapshot of one resource slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub title: &'static str,
    pub columns: &'static [Column],
    pub empty_text: &'static str,
    pub rows: Vec<Vec<String>>,
    pub pagination: Pagination,
    pub search: String,
    pub loading: bool,
    pub saving: bool,
}

impl ListingView {
    pub fn of<T: Listing>(title: &'static str, slice: &ResourceSlice<T>) -> Self {
        Self {
            title,
            columns: T::COLUMNS,
            empty_text: T::EMPTY_TEXT,
            rows: slice.items.iter().map(Listing::cells).collect(),
            pagination: slice.pagination,
            search: slice.filters.search.clone(),
            loading: slice.is_loading(),
            saving: slice.is_saving(),
        }
    }
}

/// Search field above a paginated table.
#[derive(Default)]
pub struct ResourcePage {
    search: TextInput,
    table: DataTable,
}

pub struct ResourcePageProps<'a> {
    pub view: &'a ListingView,
    pub selected: usize,
    pub focus: Focus,
    /// Whether `a`/`e` open a create/edit dialog
    pub has_form: bool,
}

impl ResourcePage {
    pub fn new() -> Self {
        Self::default()
    }

    fn search_props<'a>(props: &ResourcePageProps<'a>) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &props.view.search,
            label: "Search",
            placeholder: "Type to filter, / to focus",
            is_focused: props.focus == Focus::Search,
            masked: false,
            error: None,
            on_change: Action::SearchChange,
            on_submit: |_| Action::FocusContent,
        }
    }

    fn table_props<'a>(props: &ResourcePageProps<'a>, title: &'a str) -> DataTableProps<'a, Action> {
        let view = props.view;
        DataTableProps {
            title,
            columns: view.columns,
            rows: &view.rows,
            selected: props.selected.min(view.rows.len().saturating_sub(1)),
            loading: view.loading,
            empty_text: view.empty_text,
            pagination: Some(&view.pagination),
            is_focused: props.focus == Focus::Content,
            on_select: Action::RowSelect,
        }
    }

    fn title(view: &ListingView) -> String {
        if view.saving {
            format!("{} · saving…", view.title)
        } else {
            view.title.to_string()
        }
    }
}

impl Component<Action> for ResourcePage {
    type Props<'a> = ResourcePageProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match props.focus {
            Focus::Search => match key.code {
                KeyCode::Esc | KeyCode::Down => vec![Action::FocusContent],
                _ => self
                    .search
                    .handle_event(event, Self::search_props(&props))
                    .into_iter()
                    .collect(),
            },
            Focus::Content => {
                let title = Self::title(props.view);
                let moved: Vec<Action> = self
                    .table
                    .handle_event(event, Self::table_props(&props, &title))
                    .into_iter()
                    .collect();
                if !moved.is_empty() {
                    return moved;
                }

                let action = match key.code {
                    KeyCode::Char('/') => Action::FocusSearch,
                    KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => Action::ListNextPage,
                    KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Action::ListPrevPage,
                    KeyCode::Char('r') => Action::ListRefresh,
                    KeyCode::Char('d') | KeyCode::Delete => Action::DeleteRequest,
                    KeyCode::Char('a') if props.has_form => Action::FormOpenCreate,
                    KeyCode::Char('e') | KeyCode::Enter if props.has_form => Action::FormOpenEdit,
                    KeyCode::Esc => Action::FocusSidebar,
                    _ => return Vec::new(),
                };
                vec![action]
            }
            Focus::Sidebar => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [search, table] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

        self.search.render(frame, search, Self::search_props(&props));
        let title = Self::title(props.view);
        self.table
            .render(frame, table, Self::table_props(&props, &title));
    }
}
