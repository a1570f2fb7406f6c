//! schoolcast-dispatch: centralized state management for the SchoolCast console
//!
//! Like Redux/Elm, but for terminals. Views are pure functions of state, all
//! server data lives in resource slices, and every change goes through a
//! dispatched action.
//!
//! # Example
//! ```ignore
//! use schoolcast_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum Action {
//!     Admins(ResourceAction<Admin>),
//!     LoginSubmit,
//!     Quit,
//! }
//! ```

// Re-export everything from core
pub use schoolcast_dispatch_core::*;

// Re-export derive macros
pub use schoolcast_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    pub use schoolcast_dispatch_core::prelude::*;

    pub use schoolcast_dispatch_macros::Action;
}
