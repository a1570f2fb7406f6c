//! Overview page: counters, charts and the activity feed
//!
//! Every panel renders from its own request cell. A panel without data shows
//! its loading or error state in place; a panel that failed on refresh keeps
//! the previous data and shows the error in its bottom border.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Gauge, Paragraph, Wrap},
    Frame,
};
use schoolcast_api::resources::dashboard::{
    Activity, DashboardStats, DeliveryStats, Kpi, MessageChart, ResourceStats,
};
use schoolcast_dispatch::RequestCell;

use super::Component;
use crate::action::Action;
use crate::dashboard::DashboardState;

#[derive(Default)]
pub struct DashboardView;

pub struct DashboardViewProps<'a> {
    pub state: &'a DashboardState,
}

impl Component<Action> for DashboardView {
    type Props<'a> = DashboardViewProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let [overview, charts, feed, resources] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(9),
            Constraint::Length(5),
        ])
        .areas(area);

        panel(frame, overview, "Overview", &state.stats, draw_overview);

        let [messages, delivery] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(charts);
        let title = format!("Messages per {}  [c] period", state.period);
        panel(frame, messages, &title, &state.messages, draw_message_chart);
        panel(frame, delivery, "Delivery", &state.delivery, draw_delivery);

        let [kpis, activities] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(feed);
        panel(frame, kpis, "KPIs", &state.kpi, draw_kpis);
        panel(
            frame,
            activities,
            "Recent activity",
            &state.activities,
            draw_activities,
        );

        let columns: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(resources);
        let cells = [
            ("Schools", &state.school_stats),
            ("Students", &state.student_stats),
            ("Classes", &state.class_stats),
            ("WhatsApp", &state.whatsapp_stats),
        ];
        for (area, (title, cell)) in columns.into_iter().zip(cells) {
            panel(frame, area, title, cell, draw_resource_stats);
        }
    }
}

fn panel<T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    cell: &RequestCell<T>,
    draw: impl FnOnce(&mut Frame, Rect, &T),
) {
    let mut block = Block::bordered()
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::DarkGray));
    if let (Some(error), Some(_)) = (&cell.error, &cell.data) {
        block = block.title_bottom(Line::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red),
        ));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match (&cell.data, &cell.error) {
        (Some(data), _) => draw(frame, inner, data),
        (None, _) if cell.is_loading() => {
            frame.render_widget(
                Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
        (None, Some(error)) => {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true }),
                inner,
            );
        }
        (None, None) => {}
    }
}

/// `1234` stays `1234`, `98.26` becomes `98.3`.
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn draw_overview(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
    let counters = [
        ("Schools", stats.total_schools),
        ("Students", stats.total_students),
        ("Classes", stats.total_classes),
        ("Admins", stats.total_admins),
        ("Messages", stats.total_messages),
        ("WhatsApp", stats.active_whatsapp_accounts),
    ];
    let columns: [Rect; 6] = Layout::horizontal([Constraint::Ratio(1, 6); 6]).areas(area);
    for (area, (label, value)) in columns.into_iter().zip(counters) {
        let lines = vec![
            Line::from(value.to_string()).bold().centered(),
            Line::styled(label, Style::default().fg(Color::DarkGray)).centered(),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn draw_message_chart(frame: &mut Frame, area: Rect, chart: &MessageChart) {
    if chart.points.is_empty() {
        frame.render_widget(
            Paragraph::new("No messages in this period").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let bars: Vec<Bar> = chart
        .points
        .iter()
        .map(|p| {
            Bar::default()
                .value(p.value)
                .label(Line::from(p.label.as_str()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let count = bars.len() as u16;
    let width = (area.width / count.max(1)).saturating_sub(1).clamp(1, 8);

    frame.render_widget(
        BarChart::default()
            .bar_width(width)
            .bar_gap(1)
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars)),
        area,
    );
}

fn draw_delivery(frame: &mut Frame, area: Rect, stats: &DeliveryStats) {
    let [counts, gauge] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let row = |label: &'static str, value: u64, color: Color| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), Style::default().fg(color)),
        ])
    };
    let lines = vec![
        row("Sent", stats.sent, Color::White),
        row("Delivered", stats.delivered, Color::Green),
        row("Read", stats.read, Color::Cyan),
        row("Failed", stats.failed, Color::Red),
        row("Pending", stats.pending, Color::Yellow),
    ];
    frame.render_widget(Paragraph::new(lines), counts);

    let rate = stats.delivery_rate();
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .ratio((rate / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}% delivered", rate)),
        gauge,
    );
}

#[allow(clippy::ptr_arg)]
fn draw_kpis(frame: &mut Frame, area: Rect, kpis: &Vec<Kpi>) {
    let lines: Vec<Line> = kpis
        .iter()
        .map(|kpi| {
            let mut spans = vec![
                Span::styled(format!("{:<18}", kpi.label), Style::default().fg(Color::DarkGray)),
                Span::styled(number(kpi.value), Style::default().add_modifier(Modifier::BOLD)),
            ];
            if let Some(unit) = &kpi.unit {
                spans.push(Span::raw(format!(" {}", unit)));
            }
            if let Some(change) = kpi.change {
                let (arrow, color) = if change >= 0.0 {
                    ("▲", Color::Green)
                } else {
                    ("▼", Color::Red)
                };
                spans.push(Span::styled(
                    format!("  {} {}%", arrow, number(change.abs())),
                    Style::default().fg(color),
                ));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

#[allow(clippy::ptr_arg)]
fn draw_activities(frame: &mut Frame, area: Rect, activities: &Vec<Activity>) {
    if activities.is_empty() {
        frame.render_widget(
            Paragraph::new("Nothing yet").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }
    let lines: Vec<Line> = activities
        .iter()
        .map(|a| {
            let when = a
                .created_at
                .map(|t| t.format("%m-%d %H:%M").to_string())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{:<12}", when), Style::default().fg(Color::DarkGray)),
                Span::raw(a.description.as_str()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_resource_stats(frame: &mut Frame, area: Rect, stats: &ResourceStats) {
    let row = |label: &'static str, value: u64| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
            Span::raw(value.to_string()),
        ])
    };
    let lines = vec![
        row("Total", stats.total),
        row("Active", stats.active),
        row("New", stats.new_this_month),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
