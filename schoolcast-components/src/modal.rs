//! Modal overlays: dimmed background plus a framed dialog
//!
//! Forms and delete confirmations render on top of the page they belong to.
//! The page is drawn first, then dimmed, then the dialog is drawn into a
//! cleared, centered area.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Configuration for modal appearance
pub struct ModalStyle {
    /// Foreground applied to every background cell
    pub dim_fg: Color,
    pub border: Color,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_fg: Color::DarkGray,
            border: Color::Cyan,
        }
    }
}

impl ModalStyle {
    /// Red frame for destructive confirmations.
    pub fn danger() -> Self {
        Self {
            border: Color::Red,
            ..Default::default()
        }
    }
}

/// Fade everything rendered so far.
pub fn dim_buffer(buffer: &mut Buffer, fg: Color) {
    let area = buffer.area;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = &mut buffer[(x, y)];
            cell.set_fg(fg);
            cell.modifier.insert(Modifier::DIM);
        }
    }
}

/// Dim the background, clear `area` and frame it with a titled block.
///
/// Returns the inner area for the dialog content.
pub fn render_modal(frame: &mut Frame, area: Rect, title: &str, style: &ModalStyle) -> Rect {
    dim_buffer(frame.buffer_mut(), style.dim_fg);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(style.border))
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// A yes/no confirmation dialog centered in `area`.
pub fn render_confirm(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let dialog = centered_rect(48, 7, area);
    let inner = render_modal(frame, dialog, title, &ModalStyle::danger());

    let text = vec![
        Line::raw(message),
        Line::raw(""),
        Line::styled("[y] confirm   [n] cancel", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
