use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "entryview")]
#[command(about = "EntryView CLI: compile search requests against a view's configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "ENTRYVIEW_LOG", default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a query string into filter criteria for a view
    Compile(CompileArgs),
    /// Show the search fields a view renders for a viewer
    Fields(FieldsArgs),
    /// Normalize a query string without a view
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct ViewArgs {
    /// View settings file (.toml or .json)
    #[arg(short, long, env = "ENTRYVIEW_VIEW")]
    pub view: PathBuf,
    /// Date relative bounds are resolved against (defaults to the current UTC date)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(clap::Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Query string, e.g. "gv_search=smith&filter_4_3=Ann&mode=all"
    pub query: String,
}

#[derive(clap::Args)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    /// Query string used to pre-fill field values
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// Render as this signed-in viewer id
    #[arg(long)]
    pub viewer: Option<String>,
    /// Roles of the signed-in viewer
    #[arg(long = "role", requires = "viewer")]
    pub roles: Vec<String>,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Query string to normalize
    pub query: String,
}
