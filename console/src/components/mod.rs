//! Console views
//!
//! Each view is a [`Component`] whose props are borrowed from [`crate::state::AppState`];
//! [`crate::ui::Ui`] decides which of them receive events.

pub mod admin_dialog;
pub mod dashboard_view;
pub mod help_bar;
pub mod login_screen;
pub mod resource_page;
pub mod school_dialog;
pub mod sidebar;

pub use schoolcast_dispatch::Component;

pub use admin_dialog::{AdminDialog, AdminDialogProps};
pub use dashboard_view::{DashboardView, DashboardViewProps};
pub use help_bar::{HelpBar, HelpBarProps};
pub use login_screen::{LoginScreen, LoginScreenProps};
pub use resource_page::{ListingView, ResourcePage, ResourcePageProps};
pub use school_dialog::{SchoolDialog, SchoolDialogProps};
pub use sidebar::{Sidebar, SidebarProps};
