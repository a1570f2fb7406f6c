//! Effect handler - turns reducer effects into spawned API calls
//!
//! Task keys decide what supersedes what:
//! - list fetches share `<resource>.list`, so a newer search or page change
//!   aborts the pending one (searches are additionally debounced)
//! - each dashboard panel has its own key
//! - mutations are detached; two saves never cancel each other, but logout
//!   aborts them along with everything else
//!
//! Stale outcomes that still arrive are dropped by the reducers, which
//! compare the request sequence.

use std::time::Duration;

use schoolcast_api::resources::auth::{self, Credentials};
use schoolcast_api::resources::dashboard as api;
use schoolcast_api::resources::{self, Resource};
use schoolcast_api::{ApiClient, ApiFailure};
use schoolcast_dispatch::{
    EffectContext, RequestSeq, ResourceAction, ResourceEffect, ResourceOp, TaskKey,
};
use serde::Serialize;

use crate::action::Action;
use crate::dashboard::{DashboardAction, DashboardEffect, Panel, PanelData, ACTIVITY_LIMIT};
use crate::effect::Effect;

pub struct EffectHandler {
    client: ApiClient,
    search_debounce: Duration,
}

impl EffectHandler {
    pub fn new(client: ApiClient, search_debounce: Duration) -> Self {
        Self {
            client,
            search_debounce,
        }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            Effect::Admins(e) => self.resource(e, Action::Admins, ctx),
            Effect::Schools(e) => self.resource(e, Action::Schools, ctx),
            Effect::Students(e) => self.resource(e, Action::Students, ctx),
            Effect::Classes(e) => self.resource(e, Action::Classes, ctx),
            Effect::WhatsApp(e) => self.resource(e, Action::WhatsApp, ctx),
            Effect::Broadcasts(e) => self.resource(e, Action::Broadcasts, ctx),
            Effect::Messages(e) => self.resource(e, Action::Messages, ctx),
            Effect::Dashboard(e) => self.dashboard(e, ctx),

            Effect::Login { email, password } => {
                let client = self.client.clone();
                ctx.tasks().spawn("login", async move {
                    let credentials = Credentials { email, password };
                    match auth::login(&client, &credentials).await {
                        Ok(session) => Action::LoginDidSucceed(session.user),
                        Err(e) => Action::LoginDidFail(e.message),
                    }
                });
            }

            Effect::Logout => {
                // Nothing from the old session may land after sign-out
                ctx.tasks().cancel_all();
                if let Err(e) = auth::logout(&self.client) {
                    tracing::warn!(error = %e, "failed to clear stored session");
                }
                ctx.emit(Action::SessionDidEnd);
            }
        }
    }

    fn resource<R>(
        &self,
        effect: ResourceEffect<R>,
        wrap: fn(ResourceAction<R>) -> Action,
        ctx: &mut EffectContext<Action>,
    ) where
        R: Resource,
        R::Draft: Serialize + Sync,
    {
        let client = self.client.clone();
        match effect {
            ResourceEffect::List {
                seq,
                filters,
                debounce,
            } => {
                let task = async move {
                    wrap(match resources::list::<R>(&client, &filters).await {
                        Ok(page) => ResourceAction::DidLoad { seq, page },
                        Err(e) => failed(ResourceOp::List, seq, e),
                    })
                };
                let key = TaskKey::list(R::PLURAL);
                if debounce {
                    ctx.tasks().debounce(key, self.search_debounce, task);
                } else {
                    ctx.tasks().spawn(key, task);
                }
            }

            ResourceEffect::Get { seq, id } => {
                ctx.tasks().spawn(TaskKey::detail(R::PLURAL), async move {
                    wrap(match resources::get::<R>(&client, &id).await {
                        Ok(item) => ResourceAction::DidLoadOne { seq, item },
                        Err(e) => failed(ResourceOp::Detail, seq, e),
                    })
                });
            }

            ResourceEffect::Create { seq, draft } => {
                ctx.tasks().spawn_detached(async move {
                    wrap(match resources::create::<R>(&client, &draft).await {
                        Ok(item) => ResourceAction::DidCreate { seq, item },
                        Err(e) => failed(ResourceOp::Create, seq, e),
                    })
                });
            }

            ResourceEffect::Update { seq, id, draft } => {
                ctx.tasks().spawn_detached(async move {
                    wrap(match resources::update::<R>(&client, &id, &draft).await {
                        Ok(item) => ResourceAction::DidUpdate { seq, item },
                        Err(e) => failed(ResourceOp::Update, seq, e),
                    })
                });
            }

            ResourceEffect::Delete { seq, id } => {
                ctx.tasks().spawn_detached(async move {
                    wrap(match resources::remove::<R>(&client, &id).await {
                        Ok(id) => ResourceAction::DidDelete { seq, id },
                        Err(e) => failed(ResourceOp::Delete, seq, e),
                    })
                });
            }
        }
    }

    fn dashboard(&self, effect: DashboardEffect, ctx: &mut EffectContext<Action>) {
        let client = self.client.clone();
        let DashboardEffect { panel, seq, period } = effect;
        let key = TaskKey::new(format!("dashboard:{}", panel));
        ctx.tasks().spawn(key, async move {
            let action = match fetch_panel(&client, panel, period).await {
                Ok(data) => DashboardAction::DidLoad { seq, data },
                Err(e) => DashboardAction::DidFail {
                    panel,
                    seq,
                    error: e.message,
                },
            };
            Action::Dashboard(action)
        });
    }
}

fn failed<R: Resource>(op: ResourceOp, seq: RequestSeq, e: ApiFailure) -> ResourceAction<R> {
    ResourceAction::DidFail {
        op,
        seq,
        error: e.message,
    }
}

async fn fetch_panel(
    client: &ApiClient,
    panel: Panel,
    period: api::ChartPeriod,
) -> Result<PanelData, ApiFailure> {
    let data = match panel {
        Panel::Stats => PanelData::Stats(api::stats(client).await?),
        Panel::Kpi => PanelData::Kpi(api::kpi(client).await?),
        Panel::Messages => PanelData::Messages(api::message_charts(client, period).await?),
        Panel::Delivery => PanelData::Delivery(api::delivery_charts(client).await?),
        Panel::Activities => PanelData::Activities(api::activities(client, ACTIVITY_LIMIT).await?),
        Panel::SchoolStats => PanelData::SchoolStats(api::school_stats(client).await?),
        Panel::StudentStats => PanelData::StudentStats(api::student_stats(client).await?),
        Panel::ClassStats => PanelData::ClassStats(api::class_stats(client).await?),
        Panel::WhatsAppStats => PanelData::WhatsAppStats(api::whatsapp_stats(client).await?),
    };
    Ok(data)
}
