use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::balance::{AdjustmentRow, MissingAreaPolicy, SEALED_SURFACE};
use crate::config::{LayerSource, RunConfig};

/// Net-balance calculator for land-cover transitions
#[derive(Parser, Debug)]
#[command(name = "nettonull", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a balance described by a JSON configuration file
    Run(RunArgs),

    /// Run a balance from command-line arguments
    Balance(BalanceArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON run configuration
    #[arg(value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum MissingArea { Warn, Reject }

impl From<MissingArea> for MissingAreaPolicy {
    fn from(value: MissingArea) -> Self {
        match value {
            MissingArea::Warn => Self::Warn,
            MissingArea::Reject => Self::Reject,
        }
    }
}

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Existing-state layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub before: PathBuf,

    /// Attribute holding the before-category
    #[arg(long)]
    pub before_field: String,

    /// Planned-state layer (GeoJSON or Shapefile)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub after: PathBuf,

    /// Attribute holding the after-category
    #[arg(long)]
    pub after_field: String,

    /// `;`-delimited weight table with Description and BFF_2020 columns
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub weights: PathBuf,

    /// Output result table (must be a file path; "-" is rejected)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Manual adjustment "Before;After;Area" (repeatable; Area may be empty)
    #[arg(long = "adjustment", value_parser = parse_adjustment)]
    pub adjustments: Vec<AdjustmentRow>,

    /// Point layer of building greening measures
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub points: Option<PathBuf>,

    /// Before-category assigned to point-derived adjustments
    #[arg(long, default_value = SEALED_SURFACE)]
    pub sealed_category: String,

    /// How to treat adjustments without an area
    #[arg(long, value_enum, default_value_t = MissingArea::Warn)]
    pub missing_area: MissingArea,

    /// Skip the overlap precondition check
    #[arg(long)]
    pub no_overlap_check: bool,

    /// Write a waterfall chart (SVG)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub chart: Option<PathBuf>,

    /// Write per-after-category area totals (CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub totals: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,
}

fn parse_adjustment(value: &str) -> Result<AdjustmentRow, String> {
    AdjustmentRow::parse(value)
        .ok_or_else(|| format!("expected \"Before;After;Area\", got \"{value}\""))
}

impl BalanceArgs {
    /// Build the equivalent run configuration.
    pub fn to_config(&self) -> RunConfig {
        RunConfig {
            before: LayerSource::File(self.before.clone()),
            before_field: self.before_field.clone(),
            after: LayerSource::File(self.after.clone()),
            after_field: self.after_field.clone(),
            weights: self.weights.clone(),
            output: self.output.clone(),
            layers: Default::default(),
            adjustments: self.adjustments.clone(),
            green_points: self.points.clone().map(LayerSource::File),
            sealed_category: self.sealed_category.clone(),
            missing_area: self.missing_area.into(),
            check_overlaps: !self.no_overlap_check,
            chart: self.chart.clone(),
            totals: self.totals.clone(),
            force: self.force,
        }
    }
}
