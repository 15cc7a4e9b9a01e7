use clap::{Args, Parser, Subcommand};

use crate::ops::labels::{COST_SLIDER_MAX, INTENSITY_MAX, INTENSITY_MIN};

#[derive(Parser)]
#[command(
    name = "urge",
    about = concat!("urge v", env!("CARGO_PKG_VERSION"), " - log cravings and slips"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $URGE_DIR, then the platform data dir)
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a craving or a consumption event
    Log(LogArgs),
    /// List logged entries, newest first
    List(ListArgs),
    /// Show one entry
    Show(ShowArgs),
    /// Change an entry (rebuilds it from the edited fields)
    Edit(EditArgs),
    /// Delete an entry
    Delete(DeleteArgs),
    /// Print slider labels
    Label(LabelCmd),
    /// Show or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Entry args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LogArgs {
    /// Entry type (craving, smoked)
    #[arg(value_name = "TYPE")]
    pub entry_type: String,
    /// Category (vaping, alcohol; default from config)
    #[arg(long)]
    pub category: Option<String>,
    /// Date as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Time as HH:MM (default: now)
    #[arg(long)]
    pub time: Option<String>,
    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
    /// Craving intensity (1 mild, 2 medium, 3 strong)
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(INTENSITY_MIN as i64..=INTENSITY_MAX as i64)
    )]
    pub intensity: Option<u8>,
    /// Cost slider position, 0-40 in steps of 0.25 (alcohol only)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=COST_SLIDER_MAX as i64))]
    pub cost: Option<u32>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by category (vaping, alcohol)
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by type (craving, smoked)
    #[arg(long = "type", value_name = "TYPE")]
    pub entry_type: Option<String>,
    /// Only entries whose note matches this regex
    #[arg(long)]
    pub grep: Option<String>,
    /// Maximum number of entries to show
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID
    pub id: i64,
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry ID
    pub id: i64,
    /// New type (craving, smoked)
    #[arg(long = "type", value_name = "TYPE")]
    pub entry_type: Option<String>,
    /// New category (vaping, alcohol)
    #[arg(long)]
    pub category: Option<String>,
    /// New date as YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    /// New time as HH:MM
    #[arg(long)]
    pub time: Option<String>,
    /// New note (empty string clears it)
    #[arg(long)]
    pub note: Option<String>,
    /// New intensity (1-3)
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(INTENSITY_MIN as i64..=INTENSITY_MAX as i64)
    )]
    pub intensity: Option<u8>,
    /// New cost slider position (0-40)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=COST_SLIDER_MAX as i64))]
    pub cost: Option<u32>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Entry ID
    pub id: i64,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LabelCmd {
    #[command(subcommand)]
    pub action: LabelAction,
}

#[derive(Subcommand)]
pub enum LabelAction {
    /// Label for an intensity slider position
    Intensity(LabelIntensityArgs),
    /// Currency label for a cost slider position
    Cost(LabelCostArgs),
    /// Cost slider position for a currency amount (rounds to 0.25)
    Position(LabelPositionArgs),
}

#[derive(Args)]
pub struct LabelIntensityArgs {
    pub value: u8,
}

#[derive(Args)]
pub struct LabelCostArgs {
    pub position: u32,
}

#[derive(Args)]
pub struct LabelPositionArgs {
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (default)
    Show,
    /// Print the path to config.toml
    Path,
    /// Set a value, e.g. `config set display.currency $`
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key (display.currency, display.note_width, defaults.category, defaults.intensity)
    pub key: String,
    pub value: String,
}
