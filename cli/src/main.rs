mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands};
use crate::commands::{
    EditFields, generate_completions, run_delete, run_edit, run_list, run_login, run_logout,
    run_status,
};
use crate::context::CliContext;
use crate::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            Output::new().error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = CliContext::load(cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { email, password } => run_login(&ctx, email, password).await,
        Commands::Logout => run_logout(&ctx),
        Commands::Status => run_status(&ctx),
        Commands::List {
            page,
            per_page,
            search,
            view,
            interactive,
        } => run_list(&ctx, page, per_page, search, view, interactive).await,
        Commands::Edit {
            id,
            page,
            first_name,
            last_name,
            email,
        } => {
            let fields = EditFields {
                first_name,
                last_name,
                email,
            };
            run_edit(&ctx, id, page, fields).await
        }
        Commands::Delete { id, page, yes } => run_delete(&ctx, id, page, yes).await,
        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}
