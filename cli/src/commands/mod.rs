//! Command implementations for the roster CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;

pub use completions::generate_completions;
pub use delete::run_delete;
pub use edit::{EditFields, run_edit};
pub use list::run_list;
pub use login::{run_login, run_logout, run_status};
