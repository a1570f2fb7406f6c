//! `/dashboard/*`: aggregates for the overview page
//!
//! Each endpoint is fetched and stored independently; one failing panel
//! leaves the others alone.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ApiFailure;
use crate::models::Envelope;

/// Platform-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_schools: u64,
    pub total_students: u64,
    pub total_classes: u64,
    pub total_admins: u64,
    pub total_messages: u64,
    pub active_whatsapp_accounts: u64,
}

/// One headline indicator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub label: String,
    pub value: f64,
    /// Relative change against the previous period, in percent
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Time bucket for the message chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartPeriod {
    #[default]
    Week,
    Month,
    Year,
}

impl ChartPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartPeriod::Week => "week",
            ChartPeriod::Month => "month",
            ChartPeriod::Year => "year",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ChartPeriod::Week => ChartPeriod::Month,
            ChartPeriod::Month => ChartPeriod::Year,
            ChartPeriod::Year => ChartPeriod::Week,
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageChart {
    pub points: Vec<ChartPoint>,
}

/// Message delivery funnel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeliveryStats {
    pub sent: u64,
    pub delivered: u64,
    pub read: u64,
    pub failed: u64,
    pub pending: u64,
}

impl DeliveryStats {
    /// Delivered share of sent messages, in percent.
    pub fn delivery_rate(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.delivered as f64 * 100.0 / self.sent as f64
        }
    }
}

/// Entry of the recent activity feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Counters shared by the per-resource stats endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceStats {
    pub total: u64,
    pub active: u64,
    pub new_this_month: u64,
}

async fn fetch<T: DeserializeOwned>(
    client: &ApiClient,
    path: &str,
    query: &[(&str, String)],
    fallback: &str,
) -> Result<T, ApiFailure> {
    let envelope: Envelope<T> = client
        .get(path, query)
        .await
        .map_err(|e| e.into_failure(fallback))?;
    envelope.into_data(path).map_err(|e| e.into_failure(fallback))
}

pub async fn stats(client: &ApiClient) -> Result<DashboardStats, ApiFailure> {
    fetch(client, "/dashboard/stats", &[], "Failed to fetch dashboard stats").await
}

pub async fn kpi(client: &ApiClient) -> Result<Vec<Kpi>, ApiFailure> {
    fetch(client, "/dashboard/kpi", &[], "Failed to fetch KPIs").await
}

pub async fn message_charts(
    client: &ApiClient,
    period: ChartPeriod,
) -> Result<MessageChart, ApiFailure> {
    fetch(
        client,
        "/dashboard/charts/messages",
        &[("period", period.as_str().to_string())],
        "Failed to fetch message charts",
    )
    .await
}

pub async fn delivery_charts(client: &ApiClient) -> Result<DeliveryStats, ApiFailure> {
    fetch(
        client,
        "/dashboard/charts/delivery",
        &[],
        "Failed to fetch delivery stats",
    )
    .await
}

pub async fn activities(client: &ApiClient, limit: u32) -> Result<Vec<Activity>, ApiFailure> {
    fetch(
        client,
        "/dashboard/activities",
        &[("limit", limit.to_string())],
        "Failed to fetch recent activities",
    )
    .await
}

pub async fn school_stats(client: &ApiClient) -> Result<ResourceStats, ApiFailure> {
    fetch(client, "/dashboard/schools/stats", &[], "Failed to fetch school stats").await
}

pub async fn student_stats(client: &ApiClient) -> Result<ResourceStats, ApiFailure> {
    fetch(client, "/dashboard/students/stats", &[], "Failed to fetch student stats").await
}

pub async fn class_stats(client: &ApiClient) -> Result<ResourceStats, ApiFailure> {
    fetch(client, "/dashboard/classes/stats", &[], "Failed to fetch class stats").await
}

pub async fn whatsapp_stats(client: &ApiClient) -> Result<ResourceStats, ApiFailure> {
    fetch(
        client,
        "/dashboard/whatsapp/stats",
        &[],
        "Failed to fetch WhatsApp stats",
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_rate() {
        let stats = DeliveryStats {
            sent: 200,
            delivered: 150,
            ..Default::default()
        };
        assert_eq!(stats.delivery_rate(), 75.0);
        assert_eq!(DeliveryStats::default().delivery_rate(), 0.0);
    }

    #[test]
    fn test_period_cycle() {
        assert_eq!(ChartPeriod::default().next(), ChartPeriod::Month);
        assert_eq!(ChartPeriod::Year.next(), ChartPeriod::Week);
        assert_eq!(ChartPeriod::Month.to_string(), "month");
    }

    #[test]
    fn test_activity_type_field() {
        let activity: Activity = serde_json::from_str(
            r#"{"id":"1","type":"BROADCAST_SENT","description":"Term dates sent"}"#,
        )
        .unwrap();
        assert_eq!(activity.kind, "BROADCAST_SENT");
    }
}
