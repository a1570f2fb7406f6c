//! `/schools`

use chrono::{DateTime, Utc};
use schoolcast_dispatch_core::Entity;
use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl School {
    pub fn to_draft(&self) -> SchoolDraft {
        SchoolDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Entity for School {
    type Id = String;
    type Draft = SchoolDraft;
    const LABEL: &'static str = "School";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Resource for School {
    const PATH: &'static str = "/schools";
    const SINGULAR: &'static str = "school";
    const PLURAL: &'static str = "schools";
}
