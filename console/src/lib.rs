//! SchoolCast admin console
//!
//! A terminal client for the SchoolCast messaging platform built on the
//! dispatch pattern:
//! 1. Key events go through [`ui::Ui::map_event`] and become [`action::Action`]s
//! 2. [`reducer::reducer`] updates [`state::AppState`] and returns [`effect::Effect`]s
//! 3. [`handler::EffectHandler`] runs each effect as an API call whose outcome
//!    is dispatched back as an action
//! 4. The screen is redrawn whenever the state changed

pub mod action;
pub mod components;
pub mod config;
pub mod dashboard;
pub mod effect;
pub mod forms;
pub mod handler;
pub mod listing;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod ui;
