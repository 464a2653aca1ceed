//! Edit and delete workflows.
//!
//! A single [`MutationWorkflow`] slot drives both actions, so at most one edit or
//! delete is open at a time. The flow is always:
//!
//! 1. `begin_edit` / `begin_delete` captures the target (`Editing`)
//! 2. `submit` calls the directory (`Submitting`; further submits are rejected)
//! 3. success closes the workflow (`Idle`) and refreshes the list
//! 4. failure keeps it open (`Failed`) so the user can retry or cancel
//!
//! [`MutationWorkflow::reset`] bumps a generation counter. A submit that completes after
//! a reset leaves the slot alone and skips the refresh.
//!
//! Records are never patched locally; the list is re-fetched after a confirmed change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, info, warn};

use crate::notify::Notifier;

use super::api::{ApiError, DirectoryClient};
use super::list_sync::UserListController;
use super::types::{UpdateReceipt, UserRecord, UserUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Edit with the current draft of the form.
    Edit(UserUpdate),
    Delete,
}

impl MutationKind {
    fn success_message(&self) -> &'static str {
        match self {
            Self::Edit(_) => "User updated successfully",
            Self::Delete => "User deleted successfully",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::Edit(_) => "Failed to update user",
            Self::Delete => "Failed to delete user",
        }
    }
}

/// What the open workflow will do, and to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub target: UserRecord,
    pub kind: MutationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    /// Open, waiting for the user to confirm.
    Editing(PendingMutation),
    /// Sent to the directory; every other transition is rejected until it answers.
    Submitting(PendingMutation),
    /// Rejected by the directory; can be retried or cancelled.
    Failed(PendingMutation, ApiError),
}

impl WorkflowState {
    /// The action being edited, submitted or retried.
    pub fn pending(&self) -> Option<&PendingMutation> {
        match self {
            Self::Idle => None,
            Self::Editing(p) | Self::Submitting(p) | Self::Failed(p, _) => Some(p),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting(_))
    }

    /// Why the last submit failed.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(_, err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Another change is still being submitted")]
    Busy,
    #[error("No edit or delete is in progress")]
    NothingPending,
    #[error("The open action is not an edit")]
    NotEditing,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a confirmed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Updated {
        user: UserRecord,
        receipt: UpdateReceipt,
    },
    Deleted {
        id: u64,
    },
}

#[derive(Debug, Default)]
struct Slot {
    state: WorkflowState,
    generation: u64,
}

#[derive(Debug)]
pub struct MutationWorkflow {
    client: DirectoryClient,
    list: Arc<UserListController>,
    notifier: Notifier,
    slot: Mutex<Slot>,
}

impl MutationWorkflow {
    pub fn new(client: DirectoryClient, list: Arc<UserListController>, notifier: Notifier) -> Self {
        Self {
            client,
            list,
            notifier,
            slot: Mutex::new(Slot::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    /// True while a submit is in flight.
    pub fn is_busy(&self) -> bool {
        self.lock().state.is_busy()
    }

    fn open(&self, pending: PendingMutation) -> Result<(), WorkflowError> {
        let mut slot = self.lock();
        if slot.state.is_busy() {
            return Err(WorkflowError::Busy);
        }
        slot.state = WorkflowState::Editing(pending);
        Ok(())
    }

    /// Open the edit form for `target`, pre-filled with its current values.
    pub fn begin_edit(&self, target: UserRecord) -> Result<(), WorkflowError> {
        let draft = UserUpdate::from_record(&target);
        self.open(PendingMutation {
            target,
            kind: MutationKind::Edit(draft),
        })
    }

    /// Ask for confirmation before deleting `target`.
    pub fn begin_delete(&self, target: UserRecord) -> Result<(), WorkflowError> {
        self.open(PendingMutation {
            target,
            kind: MutationKind::Delete,
        })
    }

    /// Change the edit draft of the open edit.
    pub fn update_draft(&self, edit: impl FnOnce(&mut UserUpdate)) -> Result<(), WorkflowError> {
        let mut slot = self.lock();
        match &mut slot.state {
            WorkflowState::Idle => Err(WorkflowError::NothingPending),
            WorkflowState::Submitting(_) => Err(WorkflowError::Busy),
            WorkflowState::Editing(pending) | WorkflowState::Failed(pending, _) => {
                match &mut pending.kind {
                    MutationKind::Edit(draft) => {
                        edit(draft);
                        Ok(())
                    }
                    MutationKind::Delete => Err(WorkflowError::NotEditing),
                }
            }
        }
    }

    /// Close the open action without submitting.
    pub fn cancel(&self) -> Result<(), WorkflowError> {
        let mut slot = self.lock();
        if slot.state.is_busy() {
            return Err(WorkflowError::Busy);
        }
        slot.state = WorkflowState::Idle;
        Ok(())
    }

    /// Drop whatever is open, even mid-submit. Used on logout.
    ///
    /// A submit still in flight keeps its result to itself: the slot stays `Idle` and the
    /// list is not refreshed.
    pub fn reset(&self) {
        let mut slot = self.lock();
        slot.state = WorkflowState::Idle;
        slot.generation = slot.generation.wrapping_add(1);
    }

    /// Move out of `Submitting` into `next`, unless a reset happened meanwhile.
    fn settle(&self, generation: u64, next: WorkflowState) -> bool {
        let mut slot = self.lock();
        if slot.generation != generation || !slot.state.is_busy() {
            return false;
        }
        slot.state = next;
        true
    }

    /// Send the open action to the directory.
    ///
    /// Allowed from `Editing` and, as a retry, from `Failed`.
    pub async fn submit(&self) -> Result<MutationOutcome, WorkflowError> {
        let (pending, generation) = {
            let mut slot = self.lock();
            let pending = match &slot.state {
                WorkflowState::Idle => return Err(WorkflowError::NothingPending),
                WorkflowState::Submitting(_) => return Err(WorkflowError::Busy),
                WorkflowState::Editing(p) | WorkflowState::Failed(p, _) => p.clone(),
            };
            slot.state = WorkflowState::Submitting(pending.clone());
            (pending, slot.generation)
        };

        let id = pending.target.id;
        let result = match &pending.kind {
            MutationKind::Edit(draft) => {
                info!("workflow: updating user {id}");
                self.client
                    .update_user(id, draft)
                    .await
                    .map(|receipt| MutationOutcome::Updated {
                        user: receipt.apply_to(&pending.target, draft),
                        receipt,
                    })
            }
            MutationKind::Delete => {
                info!("workflow: deleting user {id}");
                self.client
                    .delete_user(id)
                    .await
                    .map(|()| MutationOutcome::Deleted { id })
            }
        };

        match result {
            Ok(outcome) => {
                if !self.settle(generation, WorkflowState::Idle) {
                    info!("workflow: user {id} changed after the workflow was reset");
                    return Ok(outcome);
                }
                self.notifier.success(pending.kind.success_message());
                // A failed refresh is reported by the list itself.
                if let Err(err) = self.list.refresh().await {
                    warn!("workflow: refresh after mutation failed: {err}");
                }
                Ok(outcome)
            }
            Err(err) => {
                error!("workflow: {err}");
                let message = pending.kind.failure_message();
                if self.settle(generation, WorkflowState::Failed(pending, err.clone())) {
                    self.notifier.error(message);
                }
                Err(WorkflowError::Api(err))
            }
        }
    }
}
