//! Multi-step reducer scenarios: login, dialogs, deletes and stale responses

use schoolcast_api::resources::{Admin, School};
use schoolcast_api::{Role, User};
use schoolcast_components::ToastKind;
use schoolcast_console::action::Action;
use schoolcast_console::effect::Effect;
use schoolcast_console::forms::AdminField;
use schoolcast_console::reducer::reducer;
use schoolcast_console::state::{AppState, Modal, Page};
use schoolcast_dispatch::{
    EffectStore, Page as ResultPage, Pagination, RequestSeq, ResourceAction, ResourceEffect,
    ResourceOp,
};

type Store = EffectStore<AppState, Action, Effect>;

fn user() -> User {
    User {
        id: "u1".into(),
        name: "Root".into(),
        email: "root@schoolcast.app".into(),
        role: Role::SuperAdmin,
        school_id: None,
    }
}

fn signed_in() -> Store {
    EffectStore::new(AppState::new(Some(user()), 10), reducer)
}

fn admin(id: &str, name: &str) -> Admin {
    Admin {
        id: id.into(),
        name: name.into(),
        email: format!("{}@school.org", name.to_lowercase()),
        role: Role::Admin,
        school_id: Some("s1".into()),
        school: None,
        created_at: None,
    }
}

fn school(id: &str, name: &str) -> School {
    School {
        id: id.into(),
        name: name.into(),
        address: None,
        phone: None,
        email: None,
        created_at: None,
    }
}

fn admin_list_seq(effects: &[Effect]) -> RequestSeq {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Admins(ResourceEffect::List { seq, .. }) => Some(*seq),
            _ => None,
        })
        .expect("admin list effect")
}

fn page_of<T>(items: Vec<T>, total_pages: u32) -> ResultPage<T> {
    let total = items.len() as u64;
    ResultPage {
        items,
        pagination: Pagination {
            page: 1,
            limit: 10,
            total,
            total_pages,
        },
    }
}

/// Navigate to the admin list and deliver `rows`.
fn load_admins(store: &mut Store, rows: Vec<Admin>, total_pages: u32) {
    let effects = store.dispatch(Action::NavigateTo(Page::Admins)).effects;
    let seq = admin_list_seq(&effects);
    store.dispatch(Action::Admins(ResourceAction::DidLoad {
        seq,
        page: page_of(rows, total_pages),
    }));
}

fn type_admin_fields(store: &mut Store, name: &str, email: &str, password: &str) {
    store.dispatch(Action::FormInput(name.into()));
    store.dispatch(Action::FormFocusNext);
    store.dispatch(Action::FormInput(email.into()));
    store.dispatch(Action::FormFocusNext);
    store.dispatch(Action::FormInput(password.into()));
}

fn admin_form(store: &Store) -> &schoolcast_console::forms::AdminForm {
    match &store.state().modal {
        Some(Modal::Admin(form)) => form,
        other => panic!("expected the admin dialog, got {other:?}"),
    }
}

#[test]
fn test_login_round_trip() {
    let mut store: Store = EffectStore::new(AppState::new(None, 10), reducer);

    let result = store.dispatch(Action::LoginSubmit);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().login.errors.get("email"), Some("Email is required"));

    store.dispatch(Action::LoginEmailChange("root@schoolcast.app".into()));
    store.dispatch(Action::LoginPasswordChange("hunter22".into()));
    let result = store.dispatch(Action::LoginSubmit);
    assert_eq!(
        result.effects,
        vec![Effect::Login {
            email: "root@schoolcast.app".into(),
            password: "hunter22".into(),
        }]
    );
    assert!(store.state().login.submitting);

    // A second Enter while waiting sends nothing
    assert!(store.dispatch(Action::LoginSubmit).effects.is_empty());

    let result = store.dispatch(Action::LoginDidSucceed(user()));
    let state = store.state();
    assert!(state.is_signed_in());
    assert_eq!(state.page, Page::Dashboard);
    assert!(!state.login.submitting);
    assert!(state.login.password.is_empty());
    assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some("Welcome, Root"));
    assert!(result
        .effects
        .iter()
        .all(|e| matches!(e, Effect::Dashboard(_))));
    assert!(state.dashboard.is_loading());
}

#[test]
fn test_login_failure_keeps_email() {
    let mut store: Store = EffectStore::new(AppState::new(None, 10), reducer);
    store.dispatch(Action::LoginEmailChange("root@schoolcast.app".into()));
    store.dispatch(Action::LoginPasswordChange("wrong".into()));
    store.dispatch(Action::LoginSubmit);

    store.dispatch(Action::LoginDidFail("Invalid credentials".into()));

    let login = &store.state().login;
    assert!(!store.state().is_signed_in());
    assert_eq!(login.failure.as_deref(), Some("Invalid credentials"));
    assert_eq!(login.email, "root@schoolcast.app");
    assert!(login.password.is_empty());
    assert!(!login.submitting);

    // Typing again clears the failure
    store.dispatch(Action::LoginPasswordChange("h".into()));
    assert!(store.state().login.failure.is_none());
}

#[test]
fn test_create_admin_requires_school_then_closes_on_success() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);

    // Opening the dialog loads the school picker
    let effects = store.dispatch(Action::FormOpenCreate).effects;
    let schools_seq = effects
        .iter()
        .find_map(|e| match e {
            Effect::Schools(ResourceEffect::List { seq, .. }) => Some(*seq),
            _ => None,
        })
        .expect("schools list effect");
    store.dispatch(Action::Schools(ResourceAction::DidLoad {
        seq: schools_seq,
        page: page_of(vec![school("s1", "Hill School")], 1),
    }));

    type_admin_fields(&mut store, "Cy", "cy@school.org", "secret1");
    let result = store.dispatch(Action::FormSubmit);
    assert!(result.effects.is_empty());
    assert_eq!(
        admin_form(&store).errors.get("schoolId"),
        Some("School is required")
    );

    store.dispatch(Action::FormFocusNext);
    store.dispatch(Action::FormFocusNext);
    assert_eq!(admin_form(&store).focus, AdminField::School);
    store.dispatch(Action::FormSchoolPick(0));

    let effects = store.dispatch(Action::FormSubmit).effects;
    let (seq, draft) = match effects.as_slice() {
        [Effect::Admins(ResourceEffect::Create { seq, draft })] => (*seq, draft.clone()),
        other => panic!("expected one create effect, got {other:?}"),
    };
    assert_eq!(draft.school_id.as_deref(), Some("s1"));
    assert_eq!(draft.password.as_deref(), Some("secret1"));
    assert_eq!(admin_form(&store).pending, Some(seq));
    assert!(store.state().admins.is_saving());

    store.dispatch(Action::Admins(ResourceAction::DidCreate {
        seq,
        item: admin("a9", "Cy"),
    }));

    let state = store.state();
    assert!(state.modal.is_none());
    assert_eq!(state.admins.items[0].id, "a9");
    assert_eq!(state.admins.pagination.total, 2);
    let toast = state.toast.as_ref().expect("toast");
    assert_eq!(toast.message, "Admin created");
    assert_eq!(toast.kind, ToastKind::Success);
    assert!(state.admins.notice.is_none());
}

#[test]
fn test_failed_save_keeps_dialog_open() {
    let mut store = signed_in();
    load_admins(&mut store, vec![], 1);
    store.dispatch(Action::FormOpenCreate);
    type_admin_fields(&mut store, "Cy", "cy@school.org", "secret1");
    store.dispatch(Action::FormFocusNext);
    store.dispatch(Action::FormToggleRole);

    let effects = store.dispatch(Action::FormSubmit).effects;
    let seq = match effects.as_slice() {
        [Effect::Admins(ResourceEffect::Create { seq, draft })] => {
            assert_eq!(draft.role, Role::SuperAdmin);
            assert_eq!(draft.school_id, None);
            *seq
        }
        other => panic!("expected one create effect, got {other:?}"),
    };

    store.dispatch(Action::Admins(ResourceAction::DidFail {
        op: ResourceOp::Create,
        seq,
        error: "Email already exists".into(),
    }));

    let state = store.state();
    let form = admin_form(&store);
    assert_eq!(form.pending, None);
    assert_eq!(form.name, "Cy");
    let toast = state.toast.as_ref().expect("toast");
    assert_eq!(toast.message, "Email already exists");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(state.admins.error.is_none());
    assert!(!state.admins.is_saving());
}

#[test]
fn test_edit_without_password_keeps_current_one() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);
    store.dispatch(Action::FormOpenEdit);
    assert_eq!(admin_form(&store).name, "Ann");

    store.dispatch(Action::FormInput("Ann Lee".into()));
    let effects = store.dispatch(Action::FormSubmit).effects;
    match effects.as_slice() {
        [Effect::Admins(ResourceEffect::Update { id, draft, .. })] => {
            assert_eq!(id, "a1");
            assert_eq!(draft.name, "Ann Lee");
            assert_eq!(draft.password, None);
        }
        other => panic!("expected one update effect, got {other:?}"),
    }
}

#[test]
fn test_delete_goes_through_confirmation() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann"), admin("a2", "Bo")], 1);

    store.dispatch(Action::RowSelect(1));
    store.dispatch(Action::DeleteRequest);
    assert_eq!(
        store.state().modal,
        Some(Modal::ConfirmDelete {
            page: Page::Admins,
            id: "a2".into(),
            name: "Bo".into(),
        })
    );

    let effects = store.dispatch(Action::DeleteConfirm).effects;
    let seq = match effects.as_slice() {
        [Effect::Admins(ResourceEffect::Delete { seq, id })] if id == "a2" => *seq,
        other => panic!("expected one delete effect, got {other:?}"),
    };
    assert!(store.state().modal.is_none());

    store.dispatch(Action::Admins(ResourceAction::DidDelete {
        seq,
        id: "a2".into(),
    }));
    let state = store.state();
    assert_eq!(state.admins.items.len(), 1);
    assert_eq!(state.admins.pagination.total, 1);
    assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some("Admin deleted"));
}

#[test]
fn test_selection_follows_a_shrinking_list() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann"), admin("a2", "Bo")], 1);

    store.dispatch(Action::RowSelect(1));
    store.dispatch(Action::DeleteRequest);
    let seq = match store.dispatch(Action::DeleteConfirm).effects.as_slice() {
        [Effect::Admins(ResourceEffect::Delete { seq, .. })] => *seq,
        other => panic!("expected one delete effect, got {other:?}"),
    };
    store.dispatch(Action::Admins(ResourceAction::DidDelete {
        seq,
        id: "a2".into(),
    }));
    assert_eq!(store.state().selected_row, 0);

    // The remaining row is still reachable without moving the cursor
    let result = store.dispatch(Action::DeleteRequest);
    assert!(result.changed);
    assert_eq!(
        store.state().modal,
        Some(Modal::ConfirmDelete {
            page: Page::Admins,
            id: "a1".into(),
            name: "Ann".into(),
        })
    );
}

#[test]
fn test_save_finishing_after_sign_out_is_ignored() {
    let mut store = signed_in();
    load_admins(&mut store, vec![], 1);

    store.dispatch(Action::FormOpenCreate);
    type_admin_fields(&mut store, "Old", "old@school.org", "secret1");
    store.dispatch(Action::FormFocusNext);
    store.dispatch(Action::FormToggleRole);
    assert_eq!(admin_form(&store).role, Role::SuperAdmin);

    let seq = match store.dispatch(Action::FormSubmit).effects.as_slice() {
        [Effect::Admins(ResourceEffect::Create { seq, .. })] => *seq,
        other => panic!("expected one create effect, got {other:?}"),
    };

    store.dispatch(Action::SessionDidEnd);
    let result = store.dispatch(Action::Admins(ResourceAction::DidCreate {
        seq,
        item: admin("a9", "Old"),
    }));

    assert!(!result.changed);
    let state = store.state();
    assert!(!state.is_signed_in());
    assert!(state.admins.items.is_empty());
    assert_eq!(state.admins.pagination.total, 0);
    assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some("Signed out"));
}

#[test]
fn test_cancelled_delete_sends_nothing() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);
    store.dispatch(Action::DeleteRequest);

    let result = store.dispatch(Action::DeleteCancel);
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert!(store.state().modal.is_none());
    assert_eq!(store.state().admins.items.len(), 1);
}

#[test]
fn test_superseded_search_result_is_dropped() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);

    let first = admin_list_seq(&store.dispatch(Action::SearchChange("b".into())).effects);
    let second = admin_list_seq(&store.dispatch(Action::SearchChange("bo".into())).effects);

    let stale = store.dispatch(Action::Admins(ResourceAction::DidLoad {
        seq: first,
        page: page_of(vec![admin("a3", "Bea"), admin("a2", "Bo")], 1),
    }));
    assert!(!stale.changed);
    assert_eq!(store.state().admins.items[0].id, "a1");
    assert!(store.state().admins.is_loading());

    store.dispatch(Action::Admins(ResourceAction::DidLoad {
        seq: second,
        page: page_of(vec![admin("a2", "Bo")], 1),
    }));
    let admins = &store.state().admins;
    assert_eq!(admins.items.len(), 1);
    assert_eq!(admins.filters.search, "bo");
    assert!(!admins.is_loading());
}

#[test]
fn test_paging_stops_at_the_last_page() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 2);

    let effects = store.dispatch(Action::ListNextPage).effects;
    match effects.as_slice() {
        [Effect::Admins(ResourceEffect::List {
            filters, debounce, ..
        })] => {
            assert_eq!(filters.page, 2);
            assert!(!debounce);
        }
        other => panic!("expected one list effect, got {other:?}"),
    }

    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);
    let result = store.dispatch(Action::ListNextPage);
    assert!(!result.changed);
    assert!(result.effects.is_empty());
    assert!(store.dispatch(Action::ListPrevPage).effects.is_empty());
}

#[test]
fn test_list_failure_becomes_error_toast() {
    let mut store = signed_in();
    let effects = store.dispatch(Action::NavigateTo(Page::Admins)).effects;
    let seq = admin_list_seq(&effects);

    store.dispatch(Action::Admins(ResourceAction::DidFail {
        op: ResourceOp::List,
        seq,
        error: "Failed to fetch admins".into(),
    }));

    let state = store.state();
    assert!(!state.admins.is_loading());
    let toast = state.toast.as_ref().expect("toast");
    assert_eq!(toast.message, "Failed to fetch admins");
    assert_eq!(toast.kind, ToastKind::Error);
}

#[test]
fn test_logout_from_sidebar() {
    let mut store = signed_in();
    load_admins(&mut store, vec![admin("a1", "Ann")], 1);

    let result = store.dispatch(Action::SidebarSelect(Page::ALL.len()));
    assert_eq!(result.effects, vec![Effect::Logout]);
    assert!(store.state().is_signed_in());

    store.dispatch(Action::SessionDidEnd);
    let state = store.state();
    assert!(!state.is_signed_in());
    assert!(state.admins.items.is_empty());
    assert_eq!(state.toast.as_ref().map(|t| t.message.as_str()), Some("Signed out"));

    // Signed out, nothing navigates
    assert!(store.dispatch(Action::NavigateTo(Page::Admins)).effects.is_empty());
}
