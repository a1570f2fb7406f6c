//! Effects - async work declared by the reducer
//!
//! The reducer stays pure; [`crate::handler::EffectHandler`] turns each
//! effect into a spawned request whose outcome comes back as an action.

use schoolcast_api::resources::{
    Admin, Broadcast, Class, DirectMessage, School, Student, WhatsAppAccount,
};
use schoolcast_dispatch::ResourceEffect;

use crate::dashboard::DashboardEffect;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Admins(ResourceEffect<Admin>),
    Schools(ResourceEffect<School>),
    Students(ResourceEffect<Student>),
    Classes(ResourceEffect<Class>),
    WhatsApp(ResourceEffect<WhatsAppAccount>),
    Broadcasts(ResourceEffect<Broadcast>),
    Messages(ResourceEffect<DirectMessage>),
    Dashboard(DashboardEffect),
    Login { email: String, password: String },
    /// Clear the stored session and cancel in-flight requests
    Logout,
}
