use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::state::{Focus, Page};

#[derive(Default)]
pub struct HelpBar;

pub struct HelpBarProps {
    pub page: Page,
    pub focus: Focus,
}

impl HelpBar {
    fn hints(props: &HelpBarProps) -> Vec<(&'static str, &'static str)> {
        let mut hints = Vec::new();
        match (props.focus, props.page) {
            (Focus::Sidebar, _) => hints.extend([("j/k", "move"), ("Enter", "open")]),
            (Focus::Search, _) => hints.extend([("type", "filter"), ("Esc", "back")]),
            (Focus::Content, Page::Dashboard) => {
                hints.extend([("r", "refresh"), ("c", "chart period")])
            }
            (Focus::Content, page) => {
                hints.extend([("/", "search"), ("n/p", "page"), ("r", "refresh")]);
                if page.has_form() {
                    hints.extend([("a", "add"), ("e", "edit")]);
                }
                hints.push(("d", "delete"));
            }
        }
        hints.extend([("Tab", "focus"), ("q", "quit")]);
        hints
    }
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let spans: Vec<Span> = Self::hints(&props)
            .into_iter()
            .flat_map(|(key, what)| {
                [
                    Span::styled(format!(" {}", key), Style::default().fg(Color::Cyan).bold()),
                    Span::styled(format!(" {} ", what), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
