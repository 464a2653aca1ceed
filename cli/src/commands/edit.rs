//! Edit user command.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use inquire::Text;
use roster_business::{AdminConsole, MutationOutcome, UserRecord, UserUpdate, WorkflowError};
use tracing::{error, instrument};

use crate::cli::ViewMode;
use crate::commands::list::render_page;
use crate::commands::login::ensure_authenticated;
use crate::context::{CliContext, load_page};
use crate::output::Output;

/// Field values given on the command line. `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct EditFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl EditFields {
    fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    fn apply(self, draft: &mut UserUpdate) {
        if let Some(first_name) = self.first_name {
            draft.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            draft.last_name = Some(last_name);
        }
        if let Some(email) = self.email {
            draft.email = Some(email);
        }
    }
}

fn prompt_field(label: &str, current: &str) -> Result<String> {
    Text::new(label)
        .with_default(current)
        .prompt()
        .with_context(|| format!("Failed to read {label}"))
}

/// Prompt for every field, pre-filled with the user's current values.
fn prompt_fields(user: &UserRecord) -> Result<EditFields> {
    Ok(EditFields {
        first_name: Some(prompt_field("First name:", &user.first_name)?),
        last_name: Some(prompt_field("Last name:", &user.last_name)?),
        email: Some(prompt_field("Email:", &user.email)?),
    })
}

/// Run the edit workflow for `user`. Returns whether the update went through.
pub async fn edit_user(
    console: &AdminConsole,
    out: &Output,
    user: UserRecord,
    fields: EditFields,
) -> Result<bool> {
    let fields = if fields.is_empty() && std::io::stdin().is_terminal() {
        prompt_fields(&user)?
    } else {
        fields
    };

    let workflow = console.workflow();
    workflow.begin_edit(user)?;
    workflow.update_draft(|draft| fields.apply(draft))?;

    let result = workflow.submit().await;
    out.notices(console.notices());
    match result {
        Ok(MutationOutcome::Updated { user, .. }) => {
            out.labeled_indent("Name", user.full_name(), 2);
            out.labeled_indent("Email", &user.email, 2);
            Ok(true)
        }
        Ok(MutationOutcome::Deleted { .. }) => Ok(true),
        Err(WorkflowError::Api(err)) => {
            error!("Update failed: {err}");
            out.dim(err.message());
            workflow.cancel()?;
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip_all, name = "edit", fields(id = id, page = page))]
pub async fn run_edit(
    ctx: &CliContext,
    id: u64,
    page: u32,
    fields: EditFields,
) -> Result<ExitCode> {
    let out = Output::new();
    let console = &ctx.console;

    ensure_authenticated(console, &out).await?;
    if !load_page(console, &out, page, console.config().page_size).await {
        return Ok(ExitCode::FAILURE);
    }

    let Some(user) = console.list().find_user(id) else {
        out.error(format!("User {id} is not on page {page}"));
        return Ok(ExitCode::FAILURE);
    };

    let updated = edit_user(console, &out, user, fields).await?;
    out.newline();
    render_page(console, &out, ViewMode::Table);
    Ok(if updated {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
