use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use schoolcast_api::User;
use schoolcast_components::{SelectList, SelectListProps};
use schoolcast_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::state::Page;

/// Label of the entry after the last page.
pub const LOGOUT_LABEL: &str = "Logout";

/// Navigation menu: every page, then Logout.
#[derive(Default)]
pub struct Sidebar {
    list: SelectList,
}

pub struct SidebarProps<'a> {
    pub cursor: usize,
    pub page: Page,
    pub user: Option<&'a User>,
    pub is_focused: bool,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    fn items() -> Vec<&'static str> {
        Page::ALL
            .iter()
            .map(|p| p.title())
            .chain(std::iter::once(LOGOUT_LABEL))
            .collect()
    }

    fn list_props<'a>(items: &'a [&'a str], props: &SidebarProps<'_>) -> SelectListProps<'a, Action> {
        SelectListProps {
            items,
            highlighted: props.cursor,
            active: Page::ALL.iter().position(|p| *p == props.page),
            title: "SchoolCast",
            is_focused: props.is_focused,
            on_highlight: Action::SidebarHighlight,
            on_select: Action::SidebarSelect,
        }
    }
}

impl Component<Action> for Sidebar {
    type Props<'a> = SidebarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let items = Self::items();
        self.list
            .handle_event(event, Self::list_props(&items, &props))
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [menu, account] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).areas(area);

        let items = Self::items();
        self.list
            .render(frame, menu, Self::list_props(&items, &props));

        if let Some(user) = props.user {
            let lines = vec![
                Line::from(format!(" {}", user.name)).bold(),
                Line::styled(format!(" {}", user.role), Style::default().fg(Color::DarkGray)),
            ];
            frame.render_widget(Paragraph::new(lines), account);
        }
    }
}
