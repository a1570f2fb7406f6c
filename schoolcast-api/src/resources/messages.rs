//! `/messages`: one-to-one messages to a student's contact

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: String,
    pub student_id: String,
    #[serde(default)]
    pub content: String,
    /// e.g. `PENDING`, `SENT`, `DELIVERED`, `READ`, `FAILED`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageDraft {
    pub student_id: String,
    pub content: String,
}

impl Entity for DirectMessage {
    type Id = String;
    type Draft = DirectMessageDraft;
    const LABEL: &'static str = "Message";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for DirectMessage {
    const PATH: &'static str = "/messages";
    const SINGULAR: &'static str = "message";
    const PLURAL: &'static str = "messages";
}
