use crate::models::{Crop, SizeCategory};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agroinsight",
    version,
    about = "Weather-driven crop advisories and insights for farmers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch weather for a location and period, then print advisories and insights
    Analyze(AnalyzeArgs),
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// List the weather parameters requested from NASA POWER
    Parameters,
}

#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Crop grown on the area (repeatable)
    #[arg(long = "crop", value_enum)]
    pub crops: Vec<Crop>,

    /// Size of the crop area
    #[arg(long, value_enum)]
    pub size: Option<SizeCategory>,

    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Prompt for any field not given on the command line
    #[arg(short, long)]
    pub interactive: bool,

    /// Open the report in the terminal viewer instead of printing it
    #[arg(long)]
    pub view: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "view")]
    pub json: bool,
}
