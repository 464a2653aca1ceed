//! Login, logout and status commands.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::{Context as _, Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};
use roster_business::{AdminConsole, Credentials, LoginError};
use tracing::{error, info, instrument};

use crate::cli::ViewMode;
use crate::commands::list::render_page;
use crate::context::CliContext;
use crate::output::Output;

fn prompt_email() -> Result<String> {
    Text::new("Email:")
        .with_help_message("e.g. eve.holt@reqres.in")
        .prompt()
        .context("Failed to read email")
}

fn prompt_password() -> Result<String> {
    Password::new("Password:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read password")
}

/// Sign in with `credentials` and report the result. Returns whether it worked.
pub async fn sign_in(console: &AdminConsole, out: &Output, credentials: &Credentials) -> bool {
    match console.login(credentials).await {
        Ok(()) => {
            info!("Signed in as {}", credentials.email);
            out.notices(console.notices());
            true
        }
        Err(LoginError::Invalid(errors)) => {
            for message in errors.email.iter().chain(errors.password.iter()) {
                out.error(message);
            }
            false
        }
        Err(err) => {
            error!("Login failed: {err}");
            out.notices(console.notices());
            false
        }
    }
}

#[instrument(skip_all, name = "login")]
pub async fn run_login(
    ctx: &CliContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<ExitCode> {
    let out = Output::new();
    let console = &ctx.console;

    out.header("Sign in to the user directory");
    out.newline();

    let email = match email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    if !sign_in(console, &out, &Credentials::new(email, password)).await {
        return Ok(ExitCode::FAILURE);
    }
    out.dim(format!("Token saved to {}", ctx.config_path().display()));
    out.newline();

    render_page(console, &out, ViewMode::Table);
    Ok(ExitCode::SUCCESS)
}

/// Prompt for a login when no token is stored.
pub async fn ensure_authenticated(console: &AdminConsole, out: &Output) -> Result<()> {
    if console.is_authenticated() {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        bail!("Not signed in. Run `roster login` first.");
    }

    out.warning("Not signed in.");
    let credentials = Credentials::new(prompt_email()?, prompt_password()?);
    if !sign_in(console, out, &credentials).await {
        bail!("Sign-in failed");
    }
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &CliContext) -> Result<ExitCode> {
    let out = Output::new();
    if !ctx.console.is_authenticated() {
        out.info("Not signed in.");
        return Ok(ExitCode::SUCCESS);
    }

    ctx.console
        .logout()
        .context("Failed to remove the stored token")?;
    out.success("Signed out");
    Ok(ExitCode::SUCCESS)
}

pub fn run_status(ctx: &CliContext) -> Result<ExitCode> {
    let out = Output::new();
    let config = ctx.console.config();

    if ctx.console.is_authenticated() {
        out.success("Signed in (token stored)");
    } else {
        out.info("Not signed in");
    }
    out.labeled_indent("Directory", &config.api_base_url, 2);
    out.labeled_indent("Page size", config.page_size, 2);
    out.labeled_indent(
        "API key",
        if config.api_key().is_some() { "set" } else { "not set" },
        2,
    );
    out.labeled_indent("Config", ctx.config_path().display(), 2);
    Ok(ExitCode::SUCCESS)
}
