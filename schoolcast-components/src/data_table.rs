//! Paginated record table with loading skeleton and empty state

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use schoolcast_dispatch_core::{Component, EventKind, Pagination};

/// Rows drawn while a page is loading
const SKELETON_ROWS: usize = 5;

/// Column header and width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub width: Constraint,
}

impl Column {
    pub const fn new(header: &'static str, width: Constraint) -> Self {
        Self { header, width }
    }
}

/// Props for DataTable component
pub struct DataTableProps<'a, A> {
    pub title: &'a str,
    pub columns: &'a [Column],
    /// One entry per record, one cell per column
    pub rows: &'a [Vec<String>],
    pub selected: usize,
    pub loading: bool,
    /// Text shown when there are no rows and nothing is loading
    pub empty_text: &'a str,
    pub pagination: Option<&'a Pagination>,
    pub is_focused: bool,
    pub on_select: fn(usize) -> A,
}

/// Record table.
///
/// While `loading` is set the rows are replaced by placeholder bars so stale
/// data is never mistaken for fresh data.
#[derive(Default)]
pub struct DataTable {
    offset: usize,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn skeleton(columns: &[Column]) -> Vec<Row<'static>> {
        let bar = Style::default().fg(Color::DarkGray);
        (0..SKELETON_ROWS)
            .map(|i| {
                let cells = columns.iter().enumerate().map(|(c, _)| {
                    let len = 6 + (i * 3 + c * 5) % 9;
                    Cell::from("░".repeat(len)).style(bar)
                });
                Row::new(cells)
            })
            .collect()
    }

    fn footer(pagination: Option<&Pagination>) -> Option<String> {
        pagination.map(|p| {
            format!(
                " Page {} of {} · {} total ",
                p.page,
                p.total_pages.max(1),
                p.total
            )
        })
    }
}

impl<A> Component<A> for DataTable {
    type Props<'a> = DataTableProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        if !props.is_focused || props.loading || props.rows.is_empty() {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };

        let last = props.rows.len() - 1;
        let target = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (props.selected + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => props.selected.saturating_sub(1),
            KeyCode::Home => 0,
            KeyCode::End => last,
            _ => return None,
        };
        (target != props.selected).then(|| (props.on_select)(target))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", props.title))
            .border_style(if props.is_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        if let Some(footer) = Self::footer(props.pagination) {
            block = block.title_bottom(Line::raw(footer).right_aligned());
        }

        if !props.loading && props.rows.is_empty() {
            let empty = Paragraph::new(props.empty_text)
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(props.columns.iter().map(|c| c.header))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths: Vec<Constraint> = props.columns.iter().map(|c| c.width).collect();

        let rows: Vec<Row> = if props.loading {
            Self::skeleton(props.columns)
        } else {
            props
                .rows
                .iter()
                .map(|cells| Row::new(cells.iter().map(String::as_str)))
                .collect()
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );

        let selected = (!props.loading).then(|| props.selected.min(props.rows.len() - 1));
        let viewport = area.height.saturating_sub(3) as usize;
        if let Some(selected) = selected {
            if selected < self.offset {
                self.offset = selected;
            } else if viewport > 0 && selected >= self.offset + viewport {
                self.offset = selected + 1 - viewport;
            }
        }
        let mut state = TableState::default().with_selected(selected);
        *state.offset_mut() = if props.loading { 0 } else { self.offset };

        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_dispatch_core::testing::{key, RenderHarness};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Select(usize),
    }

    const COLUMNS: &[Column] = &[
        Column::new("Name", Constraint::Length(12)),
        Column::new("Email", Constraint::Min(10)),
    ];

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["Ann".into(), "ann@school.org".into()],
            vec!["Bob".into(), "bob@school.org".into()],
        ]
    }

    fn props<'a>(rows: &'a [Vec<String>], loading: bool) -> DataTableProps<'a, TestAction> {
        DataTableProps {
            title: "Admins",
            columns: COLUMNS,
            rows,
            selected: 0,
            loading,
            empty_text: "No admins found",
            pagination: None,
            is_focused: true,
            on_select: TestAction::Select,
        }
    }

    #[test]
    fn test_renders_rows_and_footer() {
        let rows = rows();
        let pagination = Pagination {
            page: 2,
            limit: 10,
            total: 12,
            total_pages: 2,
        };
        let mut render = RenderHarness::new(50, 8);
        let mut table = DataTable::new();

        let output = render.render_to_string_plain(|frame| {
            let props = DataTableProps {
                pagination: Some(&pagination),
                ..props(&rows, false)
            };
            table.render(frame, frame.area(), props);
        });

        assert!(output.contains("Name"));
        assert!(output.contains("ann@school.org"));
        assert!(output.contains("Page 2 of 2 · 12 total"));
    }

    #[test]
    fn test_skeleton_while_loading() {
        let rows = rows();
        let mut render = RenderHarness::new(50, 10);
        let mut table = DataTable::new();

        let output = render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, true));
        });

        assert!(output.contains("░░░"));
        assert!(!output.contains("ann@school.org"));
        assert!(!output.contains("No admins found"));
    }

    #[test]
    fn test_empty_state() {
        let mut render = RenderHarness::new(50, 6);
        let mut table = DataTable::new();

        let output = render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&[], false));
        });

        assert!(output.contains("No admins found"));
    }

    #[test]
    fn test_row_navigation() {
        let rows = rows();
        let mut table = DataTable::new();

        let actions: Vec<_> = table
            .handle_event(&EventKind::Key(key("j")), props(&rows, false))
            .into_iter()
            .collect();
        assert_eq!(actions, vec![TestAction::Select(1)]);

        let actions: Vec<_> = table
            .handle_event(&EventKind::Key(key("j")), props(&rows, true))
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }
}
