//! Business layer of the roster admin console.
//!
//! Everything here is front-end agnostic: the CLI (and any other shell) drives an
//! [`AdminConsole`] and renders its state and [`Notice`]s.

mod config;
mod console;
pub mod directory;
pub mod http;
pub mod login;
pub mod notify;
pub mod session;

pub use config::{BusinessConfig, ConfigError, DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE};
pub use console::AdminConsole;
pub use directory::{
    ApiError, ListStatus, MutationOutcome, MutationWorkflow, PageWindow, RefreshOutcome,
    UserListController, UserRecord, UserUpdate, WorkflowError, WorkflowState,
};
pub use login::{AuthState, AuthStatus, Credentials, LoginError, LoginFormErrors};
pub use notify::{Notice, NoticeLevel, Notices, Notifier};
pub use session::{MemoryTokenStore, Session, SessionError, TokenStore};
