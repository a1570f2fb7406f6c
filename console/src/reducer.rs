//! Reducer - (state, action) -> effects
//!
//! All state changes happen here. Resource actions are delegated to the
//! shared slice reducer; afterwards any error or success notice the slice
//! recorded is turned into a toast and cleared from the slice.

use schoolcast_components::ToastKind;
use schoolcast_dispatch::{
    slice, DispatchResult, Entity, RequestSeq, ResourceAction, ResourceEffect, ResourceOp,
    ResourceSlice,
};

use crate::action::Action;
use crate::dashboard::{self, DashboardAction};
use crate::effect::Effect;
use crate::forms::{AdminForm, LoginField, SchoolForm};
use crate::state::{AppState, Focus, Modal, Page};

/// Route a resource action to its slice, then settle the dialog waiting on
/// it and surface the slice's error/notice as a toast.
///
/// Outcomes arriving after sign-out belong to the old session and are dropped.
macro_rules! route {
    ($state:ident, $slice:ident, $page:expr, $wrap:path, $action:expr) => {{
        if !$state.is_signed_in() {
            return DispatchResult::unchanged();
        }
        let action = $action;
        let outcome = mutation_outcome(&action);
        let result = slice::reduce(&mut $state.$slice, action).map_effects($wrap);
        if $state.page == $page {
            // Keep the highlight on a real row once the list shrinks
            let last = $state.$slice.items.len().saturating_sub(1);
            $state.selected_row = $state.selected_row.min(last);
        }
        if let Some((seq, succeeded)) = outcome {
            settle_form($state, $page, seq, succeeded);
        }
        if let Some((message, kind)) = surface(&mut $state.$slice) {
            $state.notify(message, kind);
        }
        result
    }};
}

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Resource slices =====
        Action::Admins(a) => route!(state, admins, Page::Admins, Effect::Admins, a),
        Action::Schools(a) => route!(state, schools, Page::Schools, Effect::Schools, a),
        Action::Students(a) => route!(state, students, Page::Students, Effect::Students, a),
        Action::Classes(a) => route!(state, classes, Page::Classes, Effect::Classes, a),
        Action::WhatsApp(a) => route!(state, whatsapp, Page::WhatsApp, Effect::WhatsApp, a),
        Action::Broadcasts(a) => {
            route!(state, broadcasts, Page::Broadcasts, Effect::Broadcasts, a)
        }
        Action::Messages(a) => route!(state, messages, Page::Messages, Effect::Messages, a),
        Action::Dashboard(_) if !state.is_signed_in() => DispatchResult::unchanged(),
        Action::Dashboard(a) => {
            dashboard::reduce(&mut state.dashboard, a).map_effects(Effect::Dashboard)
        }

        // ===== Login =====
        Action::LoginEmailChange(email) => {
            state.login.email = email;
            state.login.errors.remove("email");
            state.login.failure = None;
            DispatchResult::changed()
        }

        Action::LoginPasswordChange(password) => {
            state.login.password = password;
            state.login.errors.remove("password");
            state.login.failure = None;
            DispatchResult::changed()
        }

        Action::LoginFocusNext => {
            state.login.focus = match state.login.focus {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
            DispatchResult::changed()
        }

        Action::LoginSubmit => {
            let login = &mut state.login;
            if login.submitting {
                return DispatchResult::unchanged();
            }
            login.failure = None;
            if !login.validate() {
                return DispatchResult::changed();
            }
            login.submitting = true;
            DispatchResult::changed_with(Effect::Login {
                email: login.email.trim().to_string(),
                password: login.password.clone(),
            })
        }

        Action::LoginDidSucceed(user) => {
            tracing::info!(user = %user.email, "session started");
            let greeting = format!("Welcome, {}", user.name);
            state.login = Default::default();
            state.user = Some(user);
            state.page = Page::Dashboard;
            state.sidebar_cursor = 0;
            state.focus = Focus::Sidebar;
            state.notify(greeting, ToastKind::Success);
            dashboard::reduce(&mut state.dashboard, DashboardAction::Refresh)
                .map_effects(Effect::Dashboard)
        }

        Action::LoginDidFail(message) => {
            state.login.submitting = false;
            state.login.password.clear();
            state.login.focus = LoginField::Password;
            state.login.failure = Some(message);
            DispatchResult::changed()
        }

        // ===== Session =====
        Action::SessionLogout => {
            if !state.is_signed_in() {
                return DispatchResult::unchanged();
            }
            DispatchResult::effect(Effect::Logout)
        }

        Action::SessionDidEnd => {
            state.sign_out();
            state.notify("Signed out", ToastKind::Success);
            DispatchResult::changed()
        }

        // ===== Navigation =====
        Action::NavigateTo(page) => {
            if !state.is_signed_in() {
                return DispatchResult::unchanged();
            }
            state.page = page;
            state.sidebar_cursor = Page::ALL.iter().position(|p| *p == page).unwrap_or(0);
            state.selected_row = 0;
            state.modal = None;
            state.focus = Focus::Content;
            let load = if page == Page::Dashboard {
                dashboard::reduce(&mut state.dashboard, DashboardAction::Refresh)
                    .map_effects(Effect::Dashboard)
            } else {
                on_page(state, Intent::Fetch)
            };
            DispatchResult::changed().merge(load)
        }

        Action::SidebarHighlight(index) => {
            if state.sidebar_cursor == index {
                return DispatchResult::unchanged();
            }
            state.sidebar_cursor = index;
            DispatchResult::changed()
        }

        Action::SidebarSelect(index) => match Page::ALL.get(index) {
            Some(page) => reducer(state, Action::NavigateTo(*page)),
            None => reducer(state, Action::SessionLogout),
        },

        Action::FocusSidebar => set_focus(state, Focus::Sidebar),
        Action::FocusContent => set_focus(state, Focus::Content),
        Action::FocusSearch => {
            if !state.page.is_listing() {
                return DispatchResult::unchanged();
            }
            set_focus(state, Focus::Search)
        }

        // ===== Listing pages =====
        Action::SearchChange(search) => {
            state.selected_row = 0;
            on_page(state, Intent::Search(search))
        }

        Action::RowSelect(row) => {
            if state.selected_row == row {
                return DispatchResult::unchanged();
            }
            state.selected_row = row;
            DispatchResult::changed()
        }

        Action::ListNextPage => turn_page(state, true),
        Action::ListPrevPage => turn_page(state, false),

        Action::ListRefresh => {
            if state.page == Page::Dashboard {
                return dashboard::reduce(&mut state.dashboard, DashboardAction::Refresh)
                    .map_effects(Effect::Dashboard);
            }
            on_page(state, Intent::Fetch)
        }

        // ===== Dialogs =====
        Action::FormOpenCreate => match state.page {
            Page::Admins => {
                state.modal = Some(Modal::Admin(AdminForm::create()));
                DispatchResult::changed().merge(ensure_schools(state))
            }
            Page::Schools => {
                state.modal = Some(Modal::School(SchoolForm::create()));
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::FormOpenEdit => {
            let row = state.selected_row;
            match state.page {
                Page::Admins => match state.admins.items.get(row) {
                    Some(admin) => {
                        state.modal = Some(Modal::Admin(AdminForm::edit(admin)));
                        DispatchResult::changed().merge(ensure_schools(state))
                    }
                    None => DispatchResult::unchanged(),
                },
                Page::Schools => match state.schools.items.get(row) {
                    Some(school) => {
                        state.modal = Some(Modal::School(SchoolForm::edit(school)));
                        DispatchResult::changed()
                    }
                    None => DispatchResult::unchanged(),
                },
                _ => DispatchResult::unchanged(),
            }
        }

        Action::FormClose => match state.modal {
            Some(Modal::Admin(_) | Modal::School(_)) => {
                state.modal = None;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::FormFocusNext => edit_form(state, AdminForm::focus_next, SchoolForm::focus_next),
        Action::FormFocusPrev => edit_form(state, AdminForm::focus_prev, SchoolForm::focus_prev),

        Action::FormInput(value) => match &mut state.modal {
            Some(Modal::Admin(form)) => {
                form.set_text(value);
                DispatchResult::changed()
            }
            Some(Modal::School(form)) => {
                form.set_text(value);
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::FormToggleRole => match &mut state.modal {
            Some(Modal::Admin(form)) => {
                form.toggle_role();
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::FormSchoolHighlight(index) => match &mut state.modal {
            Some(Modal::Admin(form)) => {
                form.school_cursor = index;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        Action::FormSchoolPick(index) => {
            let Some(Modal::Admin(form)) = &mut state.modal else {
                return DispatchResult::unchanged();
            };
            match state.schools.items.get(index) {
                Some(school) => {
                    form.school_cursor = index;
                    form.pick_school(school.id.clone());
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        Action::FormSubmit => submit_form(state),

        Action::DeleteRequest => match state.selected_record() {
            Some((id, name)) => {
                state.modal = Some(Modal::ConfirmDelete {
                    page: state.page,
                    id,
                    name,
                });
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        Action::DeleteConfirm => match state.modal.take() {
            Some(Modal::ConfirmDelete { page, id, .. }) => match page_action(page, Intent::Delete(id)) {
                Some(action) => DispatchResult::changed().merge(reducer(state, action)),
                None => DispatchResult::changed(),
            },
            other => {
                state.modal = other;
                DispatchResult::unchanged()
            }
        },

        Action::DeleteCancel => match state.modal {
            Some(Modal::ConfirmDelete { .. }) => {
                state.modal = None;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        // ===== Global =====
        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            match &state.toast {
                Some(toast) if state.tick >= toast.expires_at => {
                    state.toast = None;
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }

        // Quit is handled by the runtime
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Resource intents that do not depend on the record type.
enum Intent {
    Fetch,
    Search(String),
    GoToPage(u32),
    Delete(String),
}

impl Intent {
    fn into_action<T: Entity<Id = String>>(self) -> ResourceAction<T> {
        match self {
            Intent::Fetch => ResourceAction::Fetch,
            Intent::Search(search) => ResourceAction::Search(search),
            Intent::GoToPage(page) => ResourceAction::GoToPage(page),
            Intent::Delete(id) => ResourceAction::Delete(id),
        }
    }
}

fn page_action(page: Page, intent: Intent) -> Option<Action> {
    let action = match page {
        Page::Dashboard => return None,
        Page::Admins => Action::Admins(intent.into_action()),
        Page::Schools => Action::Schools(intent.into_action()),
        Page::Students => Action::Students(intent.into_action()),
        Page::Classes => Action::Classes(intent.into_action()),
        Page::WhatsApp => Action::WhatsApp(intent.into_action()),
        Page::Broadcasts => Action::Broadcasts(intent.into_action()),
        Page::Messages => Action::Messages(intent.into_action()),
    };
    Some(action)
}

fn on_page(state: &mut AppState, intent: Intent) -> DispatchResult<Effect> {
    match page_action(state.page, intent) {
        Some(action) => reducer(state, action),
        None => DispatchResult::unchanged(),
    }
}

fn set_focus(state: &mut AppState, focus: Focus) -> DispatchResult<Effect> {
    if state.focus == focus {
        return DispatchResult::unchanged();
    }
    state.focus = focus;
    DispatchResult::changed()
}

fn turn_page(state: &mut AppState, forward: bool) -> DispatchResult<Effect> {
    let target = crate::with_slice!(state, state.page, |s| {
        if forward {
            s.pagination.has_next().then_some(s.filters.page + 1)
        } else {
            s.pagination.has_prev().then(|| s.filters.page.saturating_sub(1))
        }
    });
    match target.flatten() {
        Some(page) => {
            state.selected_row = 0;
            on_page(state, Intent::GoToPage(page))
        }
        None => DispatchResult::unchanged(),
    }
}

/// The admin form's school picker reads the schools slice; load it once.
fn ensure_schools(state: &mut AppState) -> DispatchResult<Effect> {
    if !state.schools.is_empty() || state.schools.is_loading() {
        return DispatchResult::unchanged();
    }
    reducer(state, Action::Schools(ResourceAction::Fetch))
}

fn edit_form(
    state: &mut AppState,
    admin: fn(&mut AdminForm),
    school: fn(&mut SchoolForm),
) -> DispatchResult<Effect> {
    match &mut state.modal {
        Some(Modal::Admin(form)) => admin(form),
        Some(Modal::School(form)) => school(form),
        _ => return DispatchResult::unchanged(),
    }
    DispatchResult::changed()
}

fn submit_form(state: &mut AppState) -> DispatchResult<Effect> {
    match &mut state.modal {
        Some(Modal::Admin(form)) => {
            if form.pending.is_some() {
                return DispatchResult::unchanged();
            }
            if !form.validate() {
                return DispatchResult::changed();
            }
            let draft = form.to_draft();
            let action = match form.editing.clone() {
                Some(id) => ResourceAction::Update(id, draft),
                None => ResourceAction::Create(draft),
            };
            let result = slice::reduce(&mut state.admins, action);
            form.pending = result.effects.iter().find_map(mutation_seq);
            result.map_effects(Effect::Admins)
        }
        Some(Modal::School(form)) => {
            if form.pending.is_some() {
                return DispatchResult::unchanged();
            }
            if !form.validate() {
                return DispatchResult::changed();
            }
            let draft = form.to_draft();
            let action = match form.editing.clone() {
                Some(id) => ResourceAction::Update(id, draft),
                None => ResourceAction::Create(draft),
            };
            let result = slice::reduce(&mut state.schools, action);
            form.pending = result.effects.iter().find_map(mutation_seq);
            result.map_effects(Effect::Schools)
        }
        _ => DispatchResult::unchanged(),
    }
}

fn mutation_seq<T: Entity>(effect: &ResourceEffect<T>) -> Option<RequestSeq> {
    match effect {
        ResourceEffect::Create { seq, .. } | ResourceEffect::Update { seq, .. } => Some(*seq),
        _ => None,
    }
}

/// Sequence and success of a create/update outcome.
fn mutation_outcome<T: Entity>(action: &ResourceAction<T>) -> Option<(RequestSeq, bool)> {
    match action {
        ResourceAction::DidCreate { seq, .. } | ResourceAction::DidUpdate { seq, .. } => {
            Some((*seq, true))
        }
        ResourceAction::DidFail {
            op: ResourceOp::Create | ResourceOp::Update,
            seq,
            ..
        } => Some((*seq, false)),
        _ => None,
    }
}

/// Close the dialog whose submission succeeded; re-enable it on failure.
fn settle_form(state: &mut AppState, page: Page, seq: RequestSeq, succeeded: bool) {
    let pending = match (&mut state.modal, page) {
        (Some(Modal::Admin(form)), Page::Admins) => &mut form.pending,
        (Some(Modal::School(form)), Page::Schools) => &mut form.pending,
        _ => return,
    };
    if *pending != Some(seq) {
        return;
    }
    if succeeded {
        state.modal = None;
    } else {
        *pending = None;
    }
}

/// Take the slice's error or notice for display.
fn surface<T: Entity>(slice: &mut ResourceSlice<T>) -> Option<(String, ToastKind)> {
    if let Some(error) = slice.error.clone() {
        let _ = slice::reduce(slice, ResourceAction::ClearError);
        return Some((error, ToastKind::Error));
    }
    let notice = slice.notice.clone()?;
    let _ = slice::reduce(slice, ResourceAction::ClearNotice);
    Some((notice, ToastKind::Success))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolcast_api::{Role, User};

    fn signed_in() -> AppState {
        AppState::new(
            Some(User {
                id: "u1".into(),
                name: "Root".into(),
                email: "root@schoolcast.app".into(),
                role: Role::SuperAdmin,
                school_id: None,
            }),
            10,
        )
    }

    #[test]
    fn test_navigate_fetches_page() {
        let mut state = signed_in();
        let result = reducer(&mut state, Action::NavigateTo(Page::Students));

        assert!(result.changed);
        assert_eq!(state.page, Page::Students);
        assert_eq!(state.sidebar_cursor, 3);
        assert!(state.students.is_loading());
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::Students(ResourceEffect::List { debounce: false, .. })]
        ));
    }

    #[test]
    fn test_navigate_requires_session() {
        let mut state = AppState::new(None, 10);
        let result = reducer(&mut state, Action::NavigateTo(Page::Admins));
        assert!(!result.changed);
        assert_eq!(state.page, Page::Dashboard);
    }

    #[test]
    fn test_search_is_debounced_and_resets_page() {
        let mut state = signed_in();
        state.page = Page::Admins;
        state.admins.filters.page = 3;

        let result = reducer(&mut state, Action::SearchChange("ann".into()));

        assert_eq!(state.admins.filters.page, 1);
        assert_eq!(state.admins.filters.search, "ann");
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::Admins(ResourceEffect::List { debounce: true, .. })]
        ));
    }

    #[test]
    fn test_sidebar_entry_after_pages_logs_out() {
        let mut state = signed_in();
        let result = reducer(&mut state, Action::SidebarSelect(Page::ALL.len()));
        assert_eq!(result.effects, vec![Effect::Logout]);
    }

    #[test]
    fn test_login_validation_blocks_request() {
        let mut state = AppState::new(None, 10);
        reducer(&mut state, Action::LoginEmailChange("not-an-email".into()));

        let result = reducer(&mut state, Action::LoginSubmit);

        assert!(result.effects.is_empty());
        assert!(!state.login.submitting);
        assert!(state.login.errors.get("email").is_some());
    }

    #[test]
    fn test_toast_expires_on_tick() {
        let mut state = signed_in();
        state.notify("Admin created", ToastKind::Success);

        for _ in 1..crate::state::TOAST_TICKS {
            assert!(!reducer(&mut state, Action::Tick).changed);
        }
        assert!(reducer(&mut state, Action::Tick).changed);
        assert!(state.toast.is_none());
    }
}
