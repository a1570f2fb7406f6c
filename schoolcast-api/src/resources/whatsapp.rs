//! `/whatsapp`: sender numbers connected to the messaging gateway

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppAccount {
    pub id: String,
    pub phone_number: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// e.g. `CONNECTED`, `DISCONNECTED`, `PENDING`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppDraft {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl Entity for WhatsAppAccount {
    type Id = String;
    type Draft = WhatsAppDraft;
    const LABEL: &'static str = "WhatsApp account";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for WhatsAppAccount {
    const PATH: &'static str = "/whatsapp";
    const SINGULAR: &'static str = "WhatsApp account";
    const PLURAL: &'static str = "WhatsApp accounts";
}
