use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Administer a remote user directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory API base URL (overrides the config file and `ROSTER_API_BASE_URL`)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email (prompted when missing)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Account password (prompted when missing)
        #[arg(long, short = 'p')]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Status,
    /// List users page by page
    List {
        /// Page to show, starting at 1
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        per_page: Option<u32>,

        /// Only show users whose name or email contains this text
        #[arg(long, short = 's')]
        search: Option<String>,

        /// How to render the users
        #[arg(long, value_enum, default_value_t = ViewMode::Table)]
        view: ViewMode,

        /// Interactive mode (select a user to edit or delete)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Edit a user on the given page
    Edit {
        /// User ID
        id: u64,

        /// Page the user is on
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user on the given page
    Delete {
        /// User ID
        id: u64,

        /// Page the user is on
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}
