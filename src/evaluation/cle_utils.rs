use std::io::{self, Write};

use indexmap::IndexMap;

use super::evaluator::{ClosedLoopEvaluator, EvaluationPlan};
use super::metrics::{DisplacementErrorL2Metric, DistanceToRefTrajectoryMetric, YawErrorCAMetric};
use super::validators::ValidationCountingAggregator;

const METRIC_HEADER: &str = "metric";
const COUNT_HEADER: &str = "log_replayed agents";

/// Closed-loop evaluator used by the gym environment: displacement error,
/// distance to the full reference trajectory and yaw error, with no
/// validators, composite metrics or intervention validators.
pub fn get_evaluator() -> ClosedLoopEvaluator {
    let plan = EvaluationPlan::new(
        vec![
            Box::new(DisplacementErrorL2Metric),
            Box::new(DistanceToRefTrajectoryMetric::full_scene()),
            Box::new(YawErrorCAMetric),
        ],
        vec![],
        vec![],
        vec![],
    );
    ClosedLoopEvaluator::new(plan)
}

/// Aggregates the validation results accumulated so far, prints them as a
/// table on stdout and resets the evaluator.
pub fn aggregate_metrics(evaluator: &mut ClosedLoopEvaluator) -> io::Result<IndexMap<String, usize>> {
    let stdout = io::stdout();
    aggregate_metrics_to(evaluator, stdout.lock())
}

/// Same as [`aggregate_metrics`], writing the table to `writer`.
///
/// The evaluator is reset even if writing fails.
pub fn aggregate_metrics_to<W: Write>(
    evaluator: &mut ClosedLoopEvaluator,
    writer: W,
) -> io::Result<IndexMap<String, usize>> {
    let counts = ValidationCountingAggregator::default().aggregate(evaluator.validation_results());
    evaluator.reset();

    for (metric, count) in &counts {
        tracing::info!("{}: {} failed scenes", metric, count);
    }
    print_table(&counts, writer)?;
    Ok(counts)
}

fn print_table<W: Write>(counts: &IndexMap<String, usize>, mut writer: W) -> io::Result<()> {
    let name_width = counts
        .keys()
        .map(String::len)
        .chain(std::iter::once(METRIC_HEADER.len()))
        .max()
        .unwrap_or(METRIC_HEADER.len());
    let count_width = counts
        .values()
        .map(|c| c.to_string().len())
        .chain(std::iter::once(COUNT_HEADER.len()))
        .max()
        .unwrap_or(COUNT_HEADER.len());

    let border = format!("+{}+{}+", "-".repeat(name_width + 2), "-".repeat(count_width + 2));
    writeln!(writer, "{}", border)?;
    writeln!(
        writer,
        "| {:<name_width$} | {:<count_width$} |",
        METRIC_HEADER, COUNT_HEADER
    )?;
    writeln!(writer, "{}", border)?;
    for (metric, count) in counts {
        writeln!(writer, "| {:<name_width$} | {:>count_width$} |", metric, count)?;
    }
    writeln!(writer, "{}", border)?;
    Ok(())
}
