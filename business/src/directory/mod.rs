//! The remote user directory: wire types, the API client, and the controllers built on it.

mod api;
mod list_sync;
mod types;
mod workflow;

pub use api::{ApiError, ApiResult, DirectoryClient, INVALID_CREDENTIALS};
pub use list_sync::{
    FETCH_FAILED, ListSnapshot, ListStatus, PageSummary, PageWindow, RefreshOutcome,
    UserListController, filter_users,
};
pub use types::{DEFAULT_STATUS, LoginResponse, UpdateReceipt, UserPage, UserRecord, UserUpdate};
pub use workflow::{
    MutationKind, MutationOutcome, MutationWorkflow, PendingMutation, WorkflowError,
    WorkflowState,
};
