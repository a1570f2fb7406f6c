//! View components for the SchoolCast console
//!
//! Components implement the `Component<A>` trait and emit actions through
//! callback functions passed in their props. They never read the store
//! directly; the console's views build props from slices.
//!
//! # Components
//!
//! - [`TextInput`] - labelled form field with cursor, masking and inline error
//! - [`SelectList`] - bordered list for the sidebar and pickers
//! - [`DataTable`] - record table with loading skeleton, empty state and pagination footer
//! - [`Toast`] - transient success/error notification
//! - [`render_modal`] / [`render_confirm`] - dialogs over a dimmed page
//!
//! # Example
//!
//! ```ignore
//! use schoolcast_components::{DataTable, DataTableProps};
//!
//! let mut table = DataTable::new();
//! table.render(frame, area, DataTableProps {
//!     title: "Admins",
//!     columns: ADMIN_COLUMNS,
//!     rows: &rows,
//!     selected: state.ui.selected_row,
//!     loading: state.admins.is_loading(),
//!     empty_text: "No admins found",
//!     pagination: Some(&state.admins.pagination),
//!     is_focused: true,
//!     on_select: Action::SelectRow,
//! });
//! ```

mod data_table;
mod modal;
mod select_list;
mod text_input;
mod toast;

pub use data_table::{Column, DataTable, DataTableProps};
pub use modal::{centered_rect, dim_buffer, render_confirm, render_modal, ModalStyle};
pub use select_list::{SelectList, SelectListProps};
pub use text_input::{TextInput, TextInputProps};
pub use toast::{Toast, ToastKind, ToastProps};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        centered_rect, render_confirm, render_modal, Column, DataTable, DataTableProps,
        ModalStyle, SelectList, SelectListProps, TextInput, TextInputProps, Toast, ToastKind,
        ToastProps,
    };
}
