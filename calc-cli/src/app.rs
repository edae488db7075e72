//! Glue between the command line and the calculator kernels: store wiring,
//! persisted histories and result rendering.

use anyhow::{Context, Result};
use calc_core::calculations::finance::MortgageResult;
use calc_core::calculations::math::primes::format_factors;
use calc_core::calculations::math::scientific::Evaluation;
use calc_core::calculations::math::{AngleMode, ScientificCalculator, factorize, is_prime};
use calc_core::error::CalcResult;
use calc_core::history::{
    self, CALCULATOR_HISTORY_KEY, GENERATOR_CAPACITY, History, PASSWORD_HISTORY_KEY,
    RANDOM_HISTORY_KEY,
};
use calc_core::presentation::format::format_currency;
use calc_core::store::{MemoryStoreFactory, StoreConfig, StoreRegistry};
use calc_core::{KeyValueStore, Present, Report, ValidationError};
use calc_store_sqlite::SqliteStoreFactory;
use serde::Serialize;
use tracing::{debug, info};

use crate::csv_loader::MortgageScenario;

/// Builds a [`StoreRegistry`] with every backend this binary supports.
pub fn build_registry() -> StoreRegistry {
    StoreRegistry::new()
        .with(MemoryStoreFactory)
        .with(SqliteStoreFactory)
}

pub async fn open_store(config: &StoreConfig) -> Result<Box<dyn KeyValueStore>> {
    build_registry()
        .open(config)
        .await
        .with_context(|| format!("cannot open '{}' history store", config.backend))
}

// ─── histories ───────────────────────────────────────────────────────────────

/// The three persisted history lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Calculator,
    Password,
    Random,
}

impl HistoryKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Calculator => CALCULATOR_HISTORY_KEY,
            Self::Password => PASSWORD_HISTORY_KEY,
            Self::Random => RANDOM_HISTORY_KEY,
        }
    }

    /// Generator histories are shorter than the calculator's, which follows
    /// the configured capacity.
    pub fn capacity(
        &self,
        calculator_capacity: usize,
    ) -> usize {
        match self {
            Self::Calculator => calculator_capacity,
            Self::Password | Self::Random => GENERATOR_CAPACITY,
        }
    }
}

pub async fn load_history(
    store: &dyn KeyValueStore,
    kind: HistoryKind,
    calculator_capacity: usize,
) -> History {
    history::load_history(store, kind.key(), kind.capacity(calculator_capacity)).await
}

/// Empties a history list. Store failures are logged, as for any history write.
pub async fn clear_history(
    store: &dyn KeyValueStore,
    kind: HistoryKind,
    calculator_capacity: usize,
) {
    let empty = History::new(kind.key(), kind.capacity(calculator_capacity));
    history::save_history(store, &empty).await;
    info!(key = kind.key(), "history cleared");
}

/// Prepends `entries` (oldest first) to a generator history.
pub async fn record(
    store: &dyn KeyValueStore,
    kind: HistoryKind,
    calculator_capacity: usize,
    entries: impl IntoIterator<Item = String>,
) {
    let mut history = load_history(store, kind, calculator_capacity).await;
    for entry in entries {
        history.push(entry);
    }
    history::save_history(store, &history).await;
}

/// Evaluates expressions in order, so later ones can refer to `ans`.
///
/// Every successful evaluation is added to the persisted history, including
/// those before a failure; the first failure stops the run.
pub async fn evaluate_expressions(
    store: &dyn KeyValueStore,
    angle_mode: AngleMode,
    capacity: usize,
    expressions: &[String],
) -> CalcResult<Vec<Evaluation>> {
    let history = load_history(store, HistoryKind::Calculator, capacity).await;
    let mut calculator = ScientificCalculator::with_history(angle_mode, history);

    let mut evaluations = Vec::with_capacity(expressions.len());
    let mut failure = None;
    for expression in expressions {
        match calculator.evaluate(expression) {
            Ok(evaluation) => evaluations.push(evaluation),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }

    if !evaluations.is_empty() {
        history::save_history(store, calculator.history()).await;
    }
    match failure {
        Some(error) => Err(error),
        None => Ok(evaluations),
    }
}

// ─── prime factorization ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factorization {
    pub number: u64,
    pub is_prime: bool,
    pub factors: Vec<u64>,
}

pub fn factorization(number: u64) -> CalcResult<Factorization> {
    // factorize bounds the input before is_prime runs its own trial division
    let factors = factorize(number)?;
    Ok(Factorization {
        number,
        is_prime: is_prime(number),
        factors,
    })
}

impl Present for Factorization {
    fn report(&self) -> Report {
        Report::new("Prime Factorization")
            .line("Number", self.number.to_string())
            .line("Prime", if self.is_prime { "yes" } else { "no" })
            .line("Factors", format_factors(&self.factors))
    }
}

// ─── mortgage batch ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub label: String,
    pub result: CalcResult<MortgageResult>,
}

/// Calculates every scenario independently; a rejected scenario does not
/// stop the others.
pub fn run_mortgage_batch(scenarios: Vec<MortgageScenario>) -> Vec<BatchOutcome> {
    scenarios
        .into_iter()
        .map(|scenario| {
            let result = scenario.input.calculate();
            if let Err(error) = &result {
                debug!(label = %scenario.label, %error, "scenario rejected");
            }
            BatchOutcome {
                label: scenario.label,
                result,
            }
        })
        .collect()
}

/// One line per scenario: payment, monthly cost and total interest, or the
/// validation error.
pub fn batch_summary(outcomes: &[BatchOutcome]) -> Report {
    outcomes
        .iter()
        .fold(Report::new("Mortgage Scenarios"), |report, outcome| {
            let value = match &outcome.result {
                Ok(r) => format!(
                    "{}/mo  ({} with costs)  interest {}",
                    format_currency(r.monthly_payment),
                    format_currency(r.total_monthly_cost),
                    format_currency(r.total_interest)
                ),
                Err(e) => format!("error: {e}"),
            };
            report.line(outcome.label.clone(), value)
        })
}

// ─── rendering ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the result record as JSON instead of the text report.
    pub json: bool,
    /// Append the chart description as JSON after the text report.
    pub chart: bool,
}

pub fn render<T: Present + Serialize>(
    result: &T,
    options: OutputOptions,
) -> Result<String> {
    if options.json {
        return serde_json::to_string_pretty(result).context("cannot serialize result");
    }
    render_report(&result.report(), options)
}

pub fn render_report(
    report: &Report,
    options: OutputOptions,
) -> Result<String> {
    let mut out = report.to_string();
    if options.chart {
        if let Some(chart) = &report.chart {
            out.push_str(&serde_json::to_string_pretty(chart).context("cannot serialize chart")?);
            out.push('\n');
        }
    }
    Ok(out)
}

/// Text reports for several results, separated by blank lines.
pub fn render_all<T: Present + Serialize>(
    results: &[T],
    options: OutputOptions,
) -> Result<String> {
    if options.json {
        return serde_json::to_string_pretty(results).context("cannot serialize results");
    }
    let parts = results
        .iter()
        .map(|r| render_report(&r.report(), options))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("\n"))
}

/// Finds the [`ValidationError`] behind a failed command, if that is what it was.
pub fn validation_error(error: &anyhow::Error) -> Option<&ValidationError> {
    error.chain().find_map(|cause| cause.downcast_ref::<ValidationError>())
}
