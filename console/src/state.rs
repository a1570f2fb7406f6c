//! Application state: one slice per resource plus UI state

use schoolcast_api::resources::{
    Admin, Broadcast, Class, DirectMessage, School, Student, WhatsAppAccount,
};
use schoolcast_api::User;
use schoolcast_components::ToastKind;
use schoolcast_dispatch::{Entity, ResourceSlice};

use crate::dashboard::DashboardState;
use crate::forms::{AdminForm, LoginForm, SchoolForm};
use crate::listing::Listing;

/// Ticks a toast stays visible (the runtime ticks every 250ms).
pub const TOAST_TICKS: u64 = 16;

/// Tick interval in milliseconds.
pub const TICK_MS: u64 = 250;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Dashboard,
    Admins,
    Schools,
    Students,
    Classes,
    WhatsApp,
    Broadcasts,
    Messages,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Dashboard,
        Page::Admins,
        Page::Schools,
        Page::Students,
        Page::Classes,
        Page::WhatsApp,
        Page::Broadcasts,
        Page::Messages,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Admins => "Admins",
            Page::Schools => "Schools",
            Page::Students => "Students",
            Page::Classes => "Classes",
            Page::WhatsApp => "WhatsApp",
            Page::Broadcasts => "Broadcasts",
            Page::Messages => "Messages",
        }
    }

    /// Lower-case record name used in confirmations.
    pub fn record_name(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Admins => "admin",
            Page::Schools => "school",
            Page::Students => "student",
            Page::Classes => "class",
            Page::WhatsApp => "WhatsApp account",
            Page::Broadcasts => "broadcast",
            Page::Messages => "message",
        }
    }

    /// Pages with a create/edit dialog.
    pub fn has_form(self) -> bool {
        matches!(self, Page::Admins | Page::Schools)
    }

    pub fn is_listing(self) -> bool {
        self != Page::Dashboard
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Sidebar,
    Search,
    Content,
}

/// Dialog drawn over the current page.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Admin(AdminForm),
    School(SchoolForm),
    ConfirmDelete { page: Page, id: String, name: String },
}

/// Toast currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Signed-in user, mirrored from the persisted session
    pub user: Option<User>,
    pub login: LoginForm,

    pub page: Page,
    pub focus: Focus,
    pub sidebar_cursor: usize,
    pub selected_row: usize,
    pub modal: Option<Modal>,
    pub toast: Option<Notification>,
    pub tick: u64,

    pub dashboard: DashboardState,
    pub admins: ResourceSlice<Admin>,
    pub schools: ResourceSlice<School>,
    pub students: ResourceSlice<Student>,
    pub classes: ResourceSlice<Class>,
    pub whatsapp: ResourceSlice<WhatsAppAccount>,
    pub broadcasts: ResourceSlice<Broadcast>,
    pub messages: ResourceSlice<DirectMessage>,
}

impl AppState {
    /// Initial state; `user` comes from the stored session, if any.
    pub fn new(user: Option<User>, page_size: u32) -> Self {
        Self {
            user,
            admins: ResourceSlice::with_page_size(page_size),
            schools: ResourceSlice::with_page_size(page_size),
            students: ResourceSlice::with_page_size(page_size),
            classes: ResourceSlice::with_page_size(page_size),
            whatsapp: ResourceSlice::with_page_size(page_size),
            broadcasts: ResourceSlice::with_page_size(page_size),
            messages: ResourceSlice::with_page_size(page_size),
            ..Self::default()
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Notification {
            message: message.into(),
            kind,
            expires_at: self.tick + TOAST_TICKS,
        });
    }

    /// Id and display name of the highlighted row on the current page.
    pub fn selected_record(&self) -> Option<(String, String)> {
        let row = self.selected_row;
        crate::with_slice!(self, self.page, |s| {
            s.items.get(row).map(|r| (r.id().clone(), r.display_name()))
        })
        .flatten()
    }

    /// Drop everything loaded under the previous session.
    pub fn sign_out(&mut self) {
        let page_size = self.admins.filters.limit;
        let toast = self.toast.take();
        let tick = self.tick;
        *self = Self::new(None, page_size);
        self.toast = toast;
        self.tick = tick;
    }
}

/// Evaluate `$body` with `$slice` bound to the slice behind `$page`.
///
/// Yields `None` for the dashboard, which has no resource slice.
#[macro_export]
macro_rules! with_slice {
    ($state:expr, $page:expr, |$slice:ident| $body:expr) => {
        match $page {
            $crate::state::Page::Dashboard => None,
            $crate::state::Page::Admins => {
                let $slice = &$state.admins;
                Some($body)
            }
            $crate::state::Page::Schools => {
                let $slice = &$state.schools;
                Some($body)
            }
            $crate::state::Page::Students => {
                let $slice = &$state.students;
                Some($body)
            }
            $crate::state::Page::Classes => {
                let $slice = &$state.classes;
                Some($body)
            }
            $crate::state::Page::WhatsApp => {
                let $slice = &$state.whatsapp;
                Some($body)
            }
            $crate::state::Page::Broadcasts => {
                let $slice = &$state.broadcasts;
                Some($body)
            }
            $crate::state::Page::Messages => {
                let $slice = &$state.messages;
                Some($body)
            }
        }
    };
}
