//! Transient notification shown in the top-right corner

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use schoolcast_dispatch_core::Component;

const MAX_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn color(self) -> Color {
        match self {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ToastKind::Success => " Done ",
            ToastKind::Error => " Error ",
        }
    }
}

pub struct ToastProps<'a> {
    pub message: &'a str,
    pub kind: ToastKind,
}

/// Render-only; expiry is driven by the store.
#[derive(Default)]
pub struct Toast;

impl Toast {
    /// Area in the top-right corner of `area` sized for `message`.
    pub fn area_for(message: &str, area: Rect) -> Rect {
        let inner_width = MAX_WIDTH.saturating_sub(2).max(1);
        let len = message.chars().count() as u16;
        let width = (len + 2).clamp(12, MAX_WIDTH).min(area.width);
        let lines = len.div_ceil(inner_width).max(1);
        let height = (lines + 2).min(area.height);
        Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + 1.min(area.height.saturating_sub(height)),
            width,
            height,
        )
    }
}

impl<A> Component<A> for Toast {
    type Props<'a> = ToastProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let toast_area = Self::area_for(props.message, area);
        let color = props.kind.color();

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(props.message)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color))
                        .title(props.kind.title()),
                ),
            toast_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_dispatch_core::testing::RenderHarness;

    #[test]
    fn test_area_is_top_right() {
        let area = Toast::area_for("Admin created", Rect::new(0, 0, 80, 24));
        assert_eq!(area.y, 1);
        assert_eq!(area.x + area.width, 79);
        assert_eq!(area.height, 3);
    }

    #[test]
    fn test_long_message_wraps() {
        let message = "x".repeat(100);
        let area = Toast::area_for(&message, Rect::new(0, 0, 80, 24));
        assert_eq!(area.width, MAX_WIDTH);
        assert_eq!(area.height, 5);
    }

    #[test]
    fn test_render_error() {
        let mut render = RenderHarness::new(80, 10);
        let mut toast = Toast;

        let output = render.render_to_string_plain(|frame| {
            Component::<()>::render(
                &mut toast,
                frame,
                frame.area(),
                ToastProps {
                    message: "Email already exists",
                    kind: ToastKind::Error,
                },
            );
        });

        assert!(output.contains("Error"));
        assert!(output.contains("Email already exists"));
    }
}
