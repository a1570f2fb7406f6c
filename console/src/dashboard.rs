//! Dashboard slice: one independently loaded cell per panel
//!
//! `Refresh` starts every panel at once. Results are applied per panel, so
//! a failing panel shows its own error while the others keep their data.

use std::fmt;

use schoolcast_api::resources::dashboard::{
    Activity, ChartPeriod, DashboardStats, DeliveryStats, Kpi, MessageChart, ResourceStats,
};
use schoolcast_dispatch::{Action, ActionSummary, DispatchResult, RequestCell, RequestSeq};

/// Number of entries requested for the activity feed.
pub const ACTIVITY_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Stats,
    Kpi,
    Messages,
    Delivery,
    Activities,
    SchoolStats,
    StudentStats,
    ClassStats,
    WhatsAppStats,
}

impl Panel {
    pub const ALL: [Panel; 9] = [
        Panel::Stats,
        Panel::Kpi,
        Panel::Messages,
        Panel::Delivery,
        Panel::Activities,
        Panel::SchoolStats,
        Panel::StudentStats,
        Panel::ClassStats,
        Panel::WhatsAppStats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Stats => "stats",
            Panel::Kpi => "kpi",
            Panel::Messages => "messages",
            Panel::Delivery => "delivery",
            Panel::Activities => "activities",
            Panel::SchoolStats => "school_stats",
            Panel::StudentStats => "student_stats",
            Panel::ClassStats => "class_stats",
            Panel::WhatsAppStats => "whatsapp_stats",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a fulfilled panel request.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Stats(DashboardStats),
    Kpi(Vec<Kpi>),
    Messages(MessageChart),
    Delivery(DeliveryStats),
    Activities(Vec<Activity>),
    SchoolStats(ResourceStats),
    StudentStats(ResourceStats),
    ClassStats(ResourceStats),
    WhatsAppStats(ResourceStats),
}

impl PanelData {
    pub fn panel(&self) -> Panel {
        match self {
            PanelData::Stats(_) => Panel::Stats,
            PanelData::Kpi(_) => Panel::Kpi,
            PanelData::Messages(_) => Panel::Messages,
            PanelData::Delivery(_) => Panel::Delivery,
            PanelData::Activities(_) => Panel::Activities,
            PanelData::SchoolStats(_) => Panel::SchoolStats,
            PanelData::StudentStats(_) => Panel::StudentStats,
            PanelData::ClassStats(_) => Panel::ClassStats,
            PanelData::WhatsAppStats(_) => Panel::WhatsAppStats,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Reload every panel
    Refresh,
    /// Switch the message chart to the next period and reload it
    CyclePeriod,
    DidLoad { seq: RequestSeq, data: PanelData },
    DidFail { panel: Panel, seq: RequestSeq, error: String },
}

impl Action for DashboardAction {
    fn name(&self) -> &'static str {
        match self {
            DashboardAction::Refresh => "Refresh",
            DashboardAction::CyclePeriod => "CyclePeriod",
            DashboardAction::DidLoad { .. } => "DidLoad",
            DashboardAction::DidFail { .. } => "DidFail",
        }
    }
}

impl ActionSummary for DashboardAction {
    fn summary(&self) -> String {
        match self {
            DashboardAction::DidLoad { seq, data } => {
                format!("DidLoad {{ panel: {}, seq: {} }}", data.panel(), seq)
            }
            _ => format!("{:?}", self),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEffect {
    pub panel: Panel,
    pub seq: RequestSeq,
    pub period: ChartPeriod,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub period: ChartPeriod,
    pub stats: RequestCell<DashboardStats>,
    pub kpi: RequestCell<Vec<Kpi>>,
    pub messages: RequestCell<MessageChart>,
    pub delivery: RequestCell<DeliveryStats>,
    pub activities: RequestCell<Vec<Activity>>,
    pub school_stats: RequestCell<ResourceStats>,
    pub student_stats: RequestCell<ResourceStats>,
    pub class_stats: RequestCell<ResourceStats>,
    pub whatsapp_stats: RequestCell<ResourceStats>,
}

impl DashboardState {
    fn begin(&mut self, panel: Panel) -> DashboardEffect {
        let seq = match panel {
            Panel::Stats => self.stats.begin(),
            Panel::Kpi => self.kpi.begin(),
            Panel::Messages => self.messages.begin(),
            Panel::Delivery => self.delivery.begin(),
            Panel::Activities => self.activities.begin(),
            Panel::SchoolStats => self.school_stats.begin(),
            Panel::StudentStats => self.student_stats.begin(),
            Panel::ClassStats => self.class_stats.begin(),
            Panel::WhatsAppStats => self.whatsapp_stats.begin(),
        };
        DashboardEffect {
            panel,
            seq,
            period: self.period,
        }
    }

    fn fulfill(&mut self, seq: RequestSeq, data: PanelData) -> bool {
        match data {
            PanelData::Stats(d) => self.stats.fulfill(seq, d),
            PanelData::Kpi(d) => self.kpi.fulfill(seq, d),
            PanelData::Messages(d) => self.messages.fulfill(seq, d),
            PanelData::Delivery(d) => self.delivery.fulfill(seq, d),
            PanelData::Activities(d) => self.activities.fulfill(seq, d),
            PanelData::SchoolStats(d) => self.school_stats.fulfill(seq, d),
            PanelData::StudentStats(d) => self.student_stats.fulfill(seq, d),
            PanelData::ClassStats(d) => self.class_stats.fulfill(seq, d),
            PanelData::WhatsAppStats(d) => self.whatsapp_stats.fulfill(seq, d),
        }
    }

    fn reject(&mut self, panel: Panel, seq: RequestSeq, error: String) -> bool {
        match panel {
            Panel::Stats => self.stats.reject(seq, error),
            Panel::Kpi => self.kpi.reject(seq, error),
            Panel::Messages => self.messages.reject(seq, error),
            Panel::Delivery => self.delivery.reject(seq, error),
            Panel::Activities => self.activities.reject(seq, error),
            Panel::SchoolStats => self.school_stats.reject(seq, error),
            Panel::StudentStats => self.student_stats.reject(seq, error),
            Panel::ClassStats => self.class_stats.reject(seq, error),
            Panel::WhatsAppStats => self.whatsapp_stats.reject(seq, error),
        }
    }

    /// True while any panel is loading.
    pub fn is_loading(&self) -> bool {
        self.stats.is_loading()
            || self.kpi.is_loading()
            || self.messages.is_loading()
            || self.delivery.is_loading()
            || self.activities.is_loading()
            || self.school_stats.is_loading()
            || self.student_stats.is_loading()
            || self.class_stats.is_loading()
            || self.whatsapp_stats.is_loading()
    }
}

pub fn reduce(
    state: &mut DashboardState,
    action: DashboardAction,
) -> DispatchResult<DashboardEffect> {
    match action {
        DashboardAction::Refresh => {
            let effects = Panel::ALL.iter().map(|p| state.begin(*p)).collect();
            DispatchResult::changed_with_many(effects)
        }

        DashboardAction::CyclePeriod => {
            state.period = state.period.next();
            DispatchResult::changed_with(state.begin(Panel::Messages))
        }

        DashboardAction::DidLoad { seq, data } => state.fulfill(seq, data).into(),

        DashboardAction::DidFail { panel, seq, error } => {
            let accepted = state.reject(panel, seq, error.clone());
            if accepted {
                tracing::warn!(%panel, %error, "dashboard panel failed");
            }
            accepted.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refresh(state: &mut DashboardState) -> Vec<DashboardEffect> {
        reduce(state, DashboardAction::Refresh).effects
    }

    fn seq_of(effects: &[DashboardEffect], panel: Panel) -> RequestSeq {
        effects
            .iter()
            .find(|e| e.panel == panel)
            .map(|e| e.seq)
            .unwrap()
    }

    #[test]
    fn test_refresh_starts_every_panel() {
        let mut state = DashboardState::default();
        let effects = refresh(&mut state);

        assert_eq!(effects.len(), Panel::ALL.len());
        assert!(state.kpi.is_loading());
        assert!(state.whatsapp_stats.is_loading());
    }

    #[test]
    fn test_failure_is_isolated_to_its_panel() {
        let mut state = DashboardState::default();
        let effects = refresh(&mut state);

        reduce(
            &mut state,
            DashboardAction::DidLoad {
                seq: seq_of(&effects, Panel::Delivery),
                data: PanelData::Delivery(DeliveryStats {
                    sent: 10,
                    delivered: 9,
                    ..Default::default()
                }),
            },
        );
        reduce(
            &mut state,
            DashboardAction::DidFail {
                panel: Panel::Kpi,
                seq: seq_of(&effects, Panel::Kpi),
                error: "Failed to fetch KPIs".into(),
            },
        );

        assert_eq!(state.kpi.error.as_deref(), Some("Failed to fetch KPIs"));
        assert!(!state.kpi.is_loading());
        assert!(state.delivery.error.is_none());
        assert_eq!(state.delivery.data.as_ref().map(|d| d.sent), Some(10));
        assert!(state.stats.is_loading());
    }

    #[test]
    fn test_rejected_refresh_keeps_previous_data() {
        let mut state = DashboardState::default();
        let effects = refresh(&mut state);
        reduce(
            &mut state,
            DashboardAction::DidLoad {
                seq: seq_of(&effects, Panel::StudentStats),
                data: PanelData::StudentStats(ResourceStats {
                    total: 1200,
                    ..Default::default()
                }),
            },
        );

        let effects = refresh(&mut state);
        reduce(
            &mut state,
            DashboardAction::DidFail {
                panel: Panel::StudentStats,
                seq: seq_of(&effects, Panel::StudentStats),
                error: "Failed to fetch student stats".into(),
            },
        );

        assert_eq!(state.student_stats.data.as_ref().map(|s| s.total), Some(1200));
        assert!(state.student_stats.error.is_some());
    }

    #[test]
    fn test_stale_panel_result_is_dropped() {
        let mut state = DashboardState::default();
        let first = refresh(&mut state);
        let _second = refresh(&mut state);

        let changed = reduce(
            &mut state,
            DashboardAction::DidLoad {
                seq: seq_of(&first, Panel::Kpi),
                data: PanelData::Kpi(vec![]),
            },
        )
        .changed;

        assert!(!changed);
        assert!(state.kpi.data.is_none());
        assert!(state.kpi.is_loading());
    }

    #[test]
    fn test_cycle_period_reloads_chart_only() {
        let mut state = DashboardState::default();
        let result = reduce(&mut state, DashboardAction::CyclePeriod);

        assert_eq!(state.period, ChartPeriod::Month);
        assert_eq!(result.effects.len(), 1);
        assert_eq!(result.effects[0].panel, Panel::Messages);
        assert_eq!(result.effects[0].period, ChartPeriod::Month);
    }
}
