//! Delete user command.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::{Context as _, Result, bail};
use inquire::Confirm;
use roster_business::{AdminConsole, UserRecord, WorkflowError};
use tracing::{error, instrument};

use crate::cli::ViewMode;
use crate::commands::list::render_page;
use crate::commands::login::ensure_authenticated;
use crate::context::{CliContext, load_page};
use crate::output::Output;

/// Run the delete workflow for `user`, asking first unless `yes`.
///
/// Returns whether the user was deleted. Declining counts as success.
pub async fn delete_user(
    console: &AdminConsole,
    out: &Output,
    user: UserRecord,
    yes: bool,
) -> Result<bool> {
    let workflow = console.workflow();
    let name = user.full_name();
    workflow.begin_delete(user)?;

    if !yes {
        if !std::io::stdin().is_terminal() {
            workflow.cancel()?;
            bail!("Refusing to delete without confirmation; pass --yes");
        }
        let confirmed = Confirm::new(&format!("Are you sure you want to delete {name}?"))
            .with_default(false)
            .with_help_message("This action cannot be undone")
            .prompt()
            .context("Failed to read confirmation")?;
        if !confirmed {
            workflow.cancel()?;
            out.dim("Cancelled.");
            return Ok(true);
        }
    }

    let result = workflow.submit().await;
    out.notices(console.notices());
    match result {
        Ok(_) => Ok(true),
        Err(WorkflowError::Api(err)) => {
            error!("Delete failed: {err}");
            out.dim(err.message());
            workflow.cancel()?;
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

#[instrument(skip_all, name = "delete", fields(id = id, page = page))]
pub async fn run_delete(ctx: &CliContext, id: u64, page: u32, yes: bool) -> Result<ExitCode> {
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

    let deleted = delete_user(console, &out, user, yes).await?;
    out.newline();
    render_page(console, &out, ViewMode::Table);
    Ok(if deleted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
