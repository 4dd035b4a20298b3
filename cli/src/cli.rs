use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "varsync", about = "Synchronize CI variables on a GitLab project")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Project URL, e.g. https://gitlab.example.com/group/project
    #[arg(long, global = true)]
    pub project_url: Option<String>,

    /// API token, sent as the private_token query parameter
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to a TOML config file (default: ./varsync.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SetArgs {
    /// JSON object file mapping variable keys to desired values
    pub file: String,

    /// Overwrite variables that already exist on the project
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every variable on the project
    List,
    /// Create a single variable
    Create { key: String, value: String },
    /// Update a single existing variable
    Update { key: String, value: String },
    /// Apply a property file against the project
    Set(SetArgs),
}
