//! Console actions
//!
//! Resource slices receive their [`ResourceAction`]s wrapped in one variant
//! each; the remaining variants drive login, navigation, forms and toasts.
//! Categories are inferred from the first word of the variant name:
//! `LoginSubmit` and `LoginDidFail` both belong to `login`.

use schoolcast_api::resources::{
    Admin, Broadcast, Class, DirectMessage, School, Student, WhatsAppAccount,
};
use schoolcast_api::User;
use schoolcast_dispatch::{ActionSummary, ResourceAction};

use crate::dashboard::DashboardAction;
use crate::state::Page;

#[derive(schoolcast_dispatch::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum Action {
    // ===== Resource slices =====
    Admins(ResourceAction<Admin>),
    Schools(ResourceAction<School>),
    Students(ResourceAction<Student>),
    Classes(ResourceAction<Class>),
    #[action(category = "whatsapp")]
    WhatsApp(ResourceAction<WhatsAppAccount>),
    Broadcasts(ResourceAction<Broadcast>),
    Messages(ResourceAction<DirectMessage>),
    Dashboard(DashboardAction),

    // ===== Login =====
    LoginEmailChange(String),
    LoginPasswordChange(String),
    /// Move between the email and password fields
    LoginFocusNext,
    LoginSubmit,
    LoginDidSucceed(User),
    LoginDidFail(String),

    // ===== Session =====
    SessionLogout,
    SessionDidEnd,

    // ===== Navigation =====
    NavigateTo(Page),
    SidebarHighlight(usize),
    /// Sidebar Enter; the entry after the last page is "Logout"
    SidebarSelect(usize),
    FocusSidebar,
    FocusSearch,
    FocusContent,

    // ===== Listing pages =====
    /// Search box edit on the current page (debounced fetch)
    SearchChange(String),
    RowSelect(usize),
    ListNextPage,
    ListPrevPage,
    ListRefresh,

    // ===== Dialogs =====
    FormOpenCreate,
    FormOpenEdit,
    FormClose,
    FormFocusNext,
    FormFocusPrev,
    /// New value of the focused text field
    FormInput(String),
    FormToggleRole,
    FormSchoolHighlight(usize),
    FormSchoolPick(usize),
    FormSubmit,

    DeleteRequest,
    DeleteConfirm,
    DeleteCancel,

    // ===== Global =====
    Tick,
    Quit,
}

impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::Admins(a) => format!("Admins({})", a.summary()),
            Action::Schools(a) => format!("Schools({})", a.summary()),
            Action::Students(a) => format!("Students({})", a.summary()),
            Action::Classes(a) => format!("Classes({})", a.summary()),
            Action::WhatsApp(a) => format!("WhatsApp({})", a.summary()),
            Action::Broadcasts(a) => format!("Broadcasts({})", a.summary()),
            Action::Messages(a) => format!("Messages({})", a.summary()),
            Action::Dashboard(a) => format!("Dashboard({})", a.summary()),
            // Never log credentials or typed form values
            Action::LoginPasswordChange(_) => "LoginPasswordChange(..)".to_string(),
            Action::FormInput(_) => "FormInput(..)".to_string(),
            Action::LoginDidSucceed(user) => format!("LoginDidSucceed({})", user.email),
            _ => format!("{:?}", self),
        }
    }
}
