//! Console construction for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use roster_business::{AdminConsole, RefreshOutcome};
use tracing::instrument;

use crate::config::{Config, FileTokenStore};
use crate::output::Output;

/// What every command runs against: the console and the file backing its session.
pub struct CliContext {
    pub console: AdminConsole,
    pub config_path: PathBuf,
}

impl CliContext {
    /// Build from the default config location.
    pub fn load(api_url: Option<&str>) -> Result<Self> {
        Self::load_at(Config::config_path()?, api_url)
    }

    #[instrument(skip_all, name = "build_console", fields(path = %config_path.display()))]
    pub fn load_at(config_path: PathBuf, api_url: Option<&str>) -> Result<Self> {
        let config = Config::load_from(&config_path)?;
        let business = config.business_config(api_url)?;
        let console = AdminConsole::new(business, FileTokenStore::new(&config_path));
        Ok(Self {
            console,
            config_path,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Move the list to `(page, page_size)` and print any notices it produced.
///
/// Returns false when the page could not be loaded.
#[instrument(skip_all, name = "load_page", fields(page = page, page_size = page_size))]
pub async fn load_page(console: &AdminConsole, out: &Output, page: u32, page_size: u32) -> bool {
    let list = console.list();
    let result = match list.set_window(page, page_size).await {
        Ok(RefreshOutcome::Unchanged) => list.refresh().await,
        other => other,
    };
    out.notices(console.notices());
    result.is_ok()
}
