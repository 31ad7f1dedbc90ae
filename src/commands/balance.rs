use std::io::Write;

use anyhow::{Context, Result};

use crate::balance::{rows_from_points, BalanceInputs, BalanceResult, BalanceSummary, Balancer};
use crate::chart::WaterfallChart;
use crate::config::RunConfig;
use crate::geom::GeoKernel;
use crate::io::{self, csv, svg, write::{ensure_writable, StagedWrites}};
use crate::layer::MemoryCatalog;

/// Run the balance described by `config` and write its outputs.
///
/// Outputs are checked before any input is read. Every file is rendered to a
/// temp file first and all of them are renamed only after the last one was
/// written, so a failed run leaves none of them behind.
pub fn execute(config: &RunConfig) -> Result<BalanceSummary> {
    for target in config.outputs() {
        ensure_writable(target, config.force)?;
    }

    let result = compute(config)?;
    let mut staged = StagedWrites::new();

    staged.stage(&config.output, |w| csv::write_balance_table(&result, w))?;
    if let Some(path) = &config.totals {
        staged.stage(path, |w| csv::write_totals_table(&result, w))?;
    }
    if let Some(path) = &config.chart {
        let chart = WaterfallChart::from_result(&result);
        staged.stage(path, |w| svg::write_waterfall_svg(&chart, w))?;
        tracing::debug!("[commands::balance] chart has {} bar(s)", chart.bars.len());
    }

    let files = staged.len();
    staged.commit()?;
    tracing::info!("[commands::balance] wrote {} row(s) -> {} ({files} file(s))", result.rows().len(), config.output.display());

    Ok(result.summary(&config.output))
}

/// Resolve the inputs of `config` and run the engine without writing anything.
pub fn compute(config: &RunConfig) -> Result<BalanceResult> {
    let catalog = MemoryCatalog::from_files(&config.layers)
        .context("[commands::balance] Failed to load named layers")?;

    let before = config.before.resolve(&catalog)?;
    let after = config.after.resolve(&catalog)?;
    let weights = io::read_weight_table(&config.weights)?;

    let mut adjustments = Vec::new();
    if let Some(source) = &config.green_points {
        let points = source.resolve(&catalog)?;
        adjustments = rows_from_points(&points, &config.after_field, &config.sealed_category);
    }
    adjustments.extend(config.adjustments.iter().cloned());

    let inputs = BalanceInputs {
        before: &before,
        before_field: &config.before_field,
        after: &after,
        after_field: &config.after_field,
        weights: &weights,
        adjustments: &adjustments,
    };

    let kernel = GeoKernel;
    let result = Balancer::new(&kernel)
        .missing_area(config.missing_area)
        .check_overlaps(config.check_overlaps)
        .run(&inputs)?;
    Ok(result)
}

/// Execute and print the summary on stdout.
pub fn run(config: &RunConfig) -> Result<()> {
    let summary = execute(config)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Total balance: {}", summary.total_balance)?;
    writeln!(stdout, "Results path: {}", summary.results_path.display())?;
    Ok(())
}
