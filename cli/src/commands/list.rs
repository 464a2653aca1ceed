//! List users command.

use std::fmt;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use inquire::Select;
use roster_business::{AdminConsole, ListStatus, UserRecord};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::ViewMode;
use crate::commands::delete::delete_user;
use crate::commands::edit::{EditFields, edit_user};
use crate::commands::login::ensure_authenticated;
use crate::context::{CliContext, load_page};
use crate::output::{Output, status_label};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: truncate_str(&user.full_name(), 28),
            email: truncate_str(&user.email, 32),
            status: status_label(user),
        }
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// Print the loaded page with the search term applied.
pub fn render_page(console: &AdminConsole, out: &Output, view: ViewMode) {
    let list = console.list();
    let snapshot = list.snapshot();
    let Some(window) = &snapshot.window else {
        if let ListStatus::Failed(reason) = &snapshot.status {
            out.error(format!("Could not load users: {reason}"));
        }
        return;
    };

    let users = snapshot.visible_users();
    if users.is_empty() {
        if snapshot.search.is_empty() {
            out.dim("No users found.");
        } else {
            out.dim(format!("No users match \"{}\".", snapshot.search));
        }
    } else {
        match view {
            ViewMode::Table => {
                let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
                let mut table = Table::new(&rows);
                table.with(Style::rounded());
                out.print(table.to_string());
            }
            ViewMode::Cards => {
                for user in &users {
                    out.user_card(user);
                    out.newline();
                }
            }
        }
    }

    out.dim(format!(
        "{}  (page {} of {})",
        window.summary(),
        window.page,
        window.total_pages.max(1)
    ));
}

struct UserChoice(UserRecord);

impl fmt::Display for UserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> [{}]",
            self.0.full_name(),
            self.0.email,
            self.0.id
        )
    }
}

#[derive(Clone, Copy)]
enum UserAction {
    Edit,
    Delete,
    Cancel,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Cancel => "Cancel",
        })
    }
}

#[instrument(skip_all, name = "list", fields(page = page, search = search.as_deref().unwrap_or("")))]
pub async fn run_list(
    ctx: &CliContext,
    page: u32,
    per_page: Option<u32>,
    search: Option<String>,
    view: ViewMode,
    interactive: bool,
) -> Result<ExitCode> {
    let out = Output::new();
    let console = &ctx.console;

    ensure_authenticated(console, &out).await?;

    let list = console.list();
    if let Some(term) = search {
        list.set_search(term);
    }
    let page_size = per_page.unwrap_or_else(|| console.config().page_size);
    if !load_page(console, &out, page, page_size).await {
        render_page(console, &out, view);
        return Ok(ExitCode::FAILURE);
    }

    render_page(console, &out, view);
    if !interactive {
        return Ok(ExitCode::SUCCESS);
    }

    let choices: Vec<UserChoice> = list.visible_users().into_iter().map(UserChoice).collect();
    if choices.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let Some(UserChoice(user)) = Select::new("Select a user:", choices)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to quit")
        .prompt_skippable()
        .context("Failed to select user")?
    else {
        return Ok(ExitCode::SUCCESS);
    };

    let action = Select::new(
        &format!("What do you want to do with {}?", user.full_name()),
        vec![UserAction::Edit, UserAction::Delete, UserAction::Cancel],
    )
    .prompt_skippable()
    .context("Failed to select action")?;

    let succeeded = match action {
        Some(UserAction::Edit) => edit_user(console, &out, user, EditFields::default()).await?,
        Some(UserAction::Delete) => delete_user(console, &out, user, false).await?,
        Some(UserAction::Cancel) | None => return Ok(ExitCode::SUCCESS),
    };

    out.newline();
    render_page(console, &out, view);
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
