//! `/broadcasts`: one message fanned out to many recipients

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// e.g. `DRAFT`, `SCHEDULED`, `SENT`, `FAILED`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub recipient_count: u32,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    pub class_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Entity for Broadcast {
    type Id = String;
    type Draft = BroadcastDraft;
    const LABEL: &'static str = "Broadcast";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for Broadcast {
    const PATH: &'static str = "/broadcasts";
    const SINGULAR: &'static str = "broadcast";
    const PLURAL: &'static str = "broadcasts";
}
