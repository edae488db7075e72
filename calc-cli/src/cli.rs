//! Command-line surface: one subcommand per calculator.
//!
//! Amounts and measurements are taken as strings and converted with
//! [`calc_core::parse`], so `1,250.50` is accepted and a bad value is
//! reported against the calculator's own field name. Counts and ages are
//! parsed by clap directly.

use std::path::PathBuf;

use anyhow::Result;
use calc_core::calculations::finance::{
    CompoundFrequency, InterestInput, InterestKind, MortgageInput, RealEstateInput, RmdInput,
};
use calc_core::calculations::generators::{Distribution, PasswordOptions, RandomInput};
use calc_core::calculations::health::{
    ActivityLevel, BmiInput, BmrInput, GfrInput, Goal, IdealWeightInput,
};
use calc_core::calculations::home::{AreaShape, BtuInput, LandscapeInput, Material, SunExposure};
use calc_core::calculations::math::{
    AngleMode, ChangeDirection, GcdLcmCalculator, PercentageQuery, QuadraticInput, RoundingInput,
    RoundingMode, RoundingRequest,
};
use calc_core::calculations::stats::{ConfidenceInput, ConfidenceLevel};
use calc_core::calculations::time::{self, ShiftDirection, TimeSpan};
use calc_core::error::CalcResult;
use calc_core::parse::{parse_datetime, parse_decimal, parse_f64};
use calc_core::{Sex, UnitSystem, ValidationError};
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::debug;

use crate::app::{self, HistoryKind, OutputOptions};
use crate::config::AppConfig;
use crate::csv_loader;

/// Everyday calculators: math, finance, health, home, time and generators.
#[derive(Debug, Parser)]
#[command(name = "calc", version)]
pub struct Cli {
    /// TOML configuration file. Defaults to `calc.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `calc_core=trace`. Overrides the config file.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// History store backend (`memory` or `sqlite`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// History store connection string, e.g. `calc.db`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Print the result record as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print the chart description as JSON.
    #[arg(long, global = true)]
    pub chart: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(backend) = &self.backend {
            config.store.backend = backend.clone();
        }
        if let Some(db) = &self.db {
            config.store.connection_string = db.clone();
        }
    }

    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            chart: self.chart,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Greatest common divisor and least common multiple.
    Gcd {
        #[arg(required = true, num_args = 2.., allow_negative_numbers = true)]
        numbers: Vec<i64>,
    },

    /// Prime factorization.
    Primes { number: u64 },

    /// Solve ax² + bx + c = 0.
    Quadratic {
        #[arg(short, long, allow_hyphen_values = true)]
        a: String,
        #[arg(short, long, allow_hyphen_values = true)]
        b: String,
        #[arg(short, long, allow_hyphen_values = true)]
        c: String,
    },

    /// Round to decimal places, significant figures or a multiple.
    Round(RoundArgs),

    /// Percentage arithmetic.
    #[command(subcommand)]
    Percent(PercentCommand),

    /// Evaluate expressions; each may use `ans` for the previous result.
    Sci {
        #[arg(required = true, allow_negative_numbers = true)]
        expressions: Vec<String>,

        /// Trigonometry in radians instead of degrees.
        #[arg(long)]
        radians: bool,
    },

    /// Show or clear a saved history.
    History {
        #[arg(long, value_enum, default_value = "calculator")]
        kind: HistoryArg,

        #[arg(long)]
        clear: bool,
    },

    /// Confidence interval for a mean.
    Confidence {
        #[arg(long, allow_hyphen_values = true)]
        mean: String,
        #[arg(long)]
        std_dev: String,
        #[arg(long, short)]
        n: u64,
        /// 90, 95 or 99.
        #[arg(long, default_value = "95")]
        level: String,
    },

    /// Simple or compound interest.
    Interest {
        #[arg(long)]
        principal: String,
        /// Annual rate in percent.
        #[arg(long)]
        rate: String,
        #[arg(long)]
        years: String,
        /// `simple`, or a compounding frequency: annually, semiannually,
        /// quarterly, monthly, daily, continuous.
        #[arg(long, default_value = "monthly")]
        compound: String,
    },

    /// Mortgage payment and amortization.
    Mortgage(MortgageArgs),

    /// Mortgage payments for every scenario in a CSV file.
    MortgageBatch { file: PathBuf },

    /// Rental property yield.
    RealEstate {
        #[arg(long)]
        value: String,
        /// Gross annual rent.
        #[arg(long)]
        rent: String,
        /// Vacancy rate in percent.
        #[arg(long, default_value = "5")]
        vacancy: String,
        /// Annual operating expenses.
        #[arg(long, default_value = "0")]
        expenses: String,
        /// Annual mortgage payments.
        #[arg(long, default_value = "0")]
        debt_service: String,
        /// Total cash invested.
        #[arg(long)]
        cash: String,
    },

    /// Required minimum distribution.
    Rmd {
        #[arg(long)]
        age: u32,
        /// Account balance at the end of the prior year.
        #[arg(long)]
        balance: String,
        /// Assumed annual growth in percent, for the projection.
        #[arg(long, default_value = "5", allow_hyphen_values = true)]
        growth: String,
        #[arg(long, default_value_t = 10)]
        years: u32,
    },

    /// Body mass index.
    Bmi {
        #[arg(long)]
        weight: String,
        /// Centimetres, or inches with `--units imperial`.
        #[arg(long)]
        height: String,
        #[arg(long, default_value = "metric")]
        units: String,
    },

    /// Basal metabolic rate, daily energy and macros.
    Bmr {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        weight: String,
        #[arg(long)]
        height: String,
        #[arg(long, default_value = "metric")]
        units: String,
        /// sedentary, light, moderate, active, very_active.
        #[arg(long, default_value = "moderate")]
        activity: String,
        /// lose, maintain, gain.
        #[arg(long, default_value = "maintain")]
        goal: String,
    },

    /// Estimated glomerular filtration rate (CKD-EPI 2021).
    Gfr {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        age: u32,
        /// Serum creatinine in mg/dL.
        #[arg(long)]
        creatinine: String,
    },

    /// Ideal body weight by four formulas.
    IdealWeight {
        #[arg(long)]
        sex: String,
        #[arg(long)]
        height: String,
        #[arg(long, default_value = "metric")]
        units: String,
    },

    /// Air-conditioner sizing.
    Btu {
        #[arg(long)]
        length: String,
        #[arg(long)]
        width: String,
        #[arg(long, default_value = "8")]
        ceiling: String,
        /// shaded, average, sunny.
        #[arg(long, default_value = "average")]
        sun: String,
        #[arg(long, default_value_t = 2)]
        occupants: u32,
        #[arg(long)]
        kitchen: bool,
    },

    /// Gravel or mulch needed for an area.
    Landscape(LandscapeArgs),

    /// Random numbers.
    Random(RandomArgs),

    /// Random passwords.
    Password(PasswordArgs),

    /// Date and time arithmetic.
    #[command(subcommand)]
    Time(TimeCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HistoryArg {
    Calculator,
    Password,
    Random,
}

impl From<HistoryArg> for HistoryKind {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Calculator => HistoryKind::Calculator,
            HistoryArg::Password => HistoryKind::Password,
            HistoryArg::Random => HistoryKind::Random,
        }
    }
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["places", "figures", "nearest"])))]
pub struct RoundArgs {
    #[arg(allow_negative_numbers = true)]
    pub value: String,
    /// Decimal places.
    #[arg(long)]
    pub places: Option<u32>,
    /// Significant figures.
    #[arg(long)]
    pub figures: Option<u32>,
    /// Nearest multiple, e.g. `0.05` or `25`.
    #[arg(long)]
    pub nearest: Option<String>,
    /// standard, ceiling, floor, truncate.
    #[arg(long, default_value = "standard")]
    pub mode: String,
}

#[derive(Debug, Subcommand)]
pub enum PercentCommand {
    /// What is P% of V?
    Of {
        #[arg(allow_negative_numbers = true)]
        percent: String,
        #[arg(allow_negative_numbers = true)]
        value: String,
    },
    /// PART is what percent of WHOLE?
    What {
        #[arg(allow_negative_numbers = true)]
        part: String,
        #[arg(allow_negative_numbers = true)]
        whole: String,
    },
    /// Percentage change from ORIGINAL to NEW.
    Change {
        #[arg(allow_negative_numbers = true)]
        original: String,
        #[arg(allow_negative_numbers = true)]
        new: String,
    },
    /// VALUE increased by P%.
    Increase {
        #[arg(allow_negative_numbers = true)]
        value: String,
        percent: String,
    },
    /// VALUE decreased by P%.
    Decrease {
        #[arg(allow_negative_numbers = true)]
        value: String,
        percent: String,
    },
    /// Percentage difference between A and B.
    Diff {
        #[arg(allow_negative_numbers = true)]
        a: String,
        #[arg(allow_negative_numbers = true)]
        b: String,
    },
}

#[derive(Debug, Args)]
pub struct MortgageArgs {
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub down: String,
    /// Annual rate in percent.
    #[arg(long)]
    pub rate: String,
    #[arg(long, default_value_t = 30)]
    pub term: u32,
    /// Monthly property tax.
    #[arg(long, default_value = "0")]
    pub tax: String,
    /// Monthly insurance.
    #[arg(long, default_value = "0")]
    pub insurance: String,
    /// Monthly HOA dues.
    #[arg(long, default_value = "0")]
    pub hoa: String,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("shape").required(true).args(["length", "diameter"])))]
pub struct LandscapeArgs {
    #[arg(long, requires = "width")]
    pub length: Option<String>,
    #[arg(long)]
    pub width: Option<String>,
    #[arg(long)]
    pub diameter: Option<String>,
    /// Depth in inches.
    #[arg(long, default_value = "3")]
    pub depth: String,
    #[arg(long, default_value = "pea gravel")]
    pub material: String,
}

#[derive(Debug, Args)]
pub struct RandomArgs {
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub min: String,
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    pub max: String,
    #[arg(long, default_value_t = 1)]
    pub count: usize,
    #[arg(long, default_value_t = 2)]
    pub decimals: u32,
    /// integer, decimal, normal, unique.
    #[arg(long, default_value = "integer")]
    pub mode: String,
    /// Mean for `--mode normal`; defaults to the range midpoint.
    #[arg(long, allow_hyphen_values = true)]
    pub mean: Option<String>,
    /// Standard deviation for `--mode normal`; defaults to a sixth of the range.
    #[arg(long)]
    pub std_dev: Option<String>,
}

#[derive(Debug, Args)]
pub struct PasswordArgs {
    #[arg(long, default_value_t = 16)]
    pub length: usize,
    #[arg(long, default_value_t = 1)]
    pub count: usize,
    #[arg(long)]
    pub no_uppercase: bool,
    #[arg(long)]
    pub no_lowercase: bool,
    #[arg(long)]
    pub no_digits: bool,
    #[arg(long)]
    pub no_symbols: bool,
    /// Leave out look-alike characters such as `l`, `1` and `O`.
    #[arg(long)]
    pub exclude_similar: bool,
    /// Leave out brackets, quotes and slashes.
    #[arg(long)]
    pub exclude_ambiguous: bool,
}

#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Time between two date-times (`YYYY-MM-DD[ HH:MM[:SS]]`).
    Diff { start: String, end: String },
    /// Add or subtract a duration.
    Shift {
        start: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        days: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        hours: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        minutes: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        seconds: i64,
        #[arg(long)]
        subtract: bool,
    },
    /// Convert a wall-clock time between UTC offsets given in hours.
    Convert {
        datetime: String,
        #[arg(long, allow_hyphen_values = true)]
        from: String,
        #[arg(long, allow_hyphen_values = true)]
        to: String,
    },
}

// ─── option parsing ──────────────────────────────────────────────────────────

fn choice<T>(
    field: &str,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> CalcResult<T> {
    parse(raw).ok_or_else(|| ValidationError::invalid(field, format!("unknown option '{}'", raw.trim())))
}

fn compound_kind(raw: &str) -> CalcResult<InterestKind> {
    if raw.trim().eq_ignore_ascii_case("simple") {
        return Ok(InterestKind::Simple);
    }
    choice("compound", raw, CompoundFrequency::parse).map(InterestKind::Compound)
}

fn distribution(args: &RandomArgs) -> CalcResult<Distribution> {
    match args.mode.trim().to_ascii_lowercase().as_str() {
        "integer" | "int" => Ok(Distribution::Integer),
        "decimal" | "float" => Ok(Distribution::Decimal),
        "unique" => Ok(Distribution::Unique),
        "normal" | "gaussian" => {
            let min = parse_f64("min", &args.min)?;
            let max = parse_f64("max", &args.max)?;
            let mean = match &args.mean {
                Some(raw) => parse_f64("mean", raw)?,
                None => (min + max) / 2.0,
            };
            let std_dev = match &args.std_dev {
                Some(raw) => parse_f64("std_dev", raw)?,
                None => (max - min) / 6.0,
            };
            Ok(Distribution::Normal { mean, std_dev })
        }
        other => Err(ValidationError::invalid("mode", format!("unknown option '{other}'"))),
    }
}

fn percent_query(command: &PercentCommand) -> CalcResult<PercentageQuery> {
    Ok(match command {
        PercentCommand::Of { percent, value } => PercentageQuery::PercentOf {
            percent: parse_decimal("percent", percent)?,
            value: parse_decimal("value", value)?,
        },
        PercentCommand::What { part, whole } => PercentageQuery::WhatPercent {
            part: parse_decimal("part", part)?,
            whole: parse_decimal("whole", whole)?,
        },
        PercentCommand::Change { original, new } => PercentageQuery::Change {
            original: parse_decimal("original", original)?,
            new: parse_decimal("new", new)?,
        },
        PercentCommand::Increase { value, percent } => PercentageQuery::ApplyChange {
            value: parse_decimal("value", value)?,
            percent: parse_decimal("percent", percent)?,
            direction: ChangeDirection::Increase,
        },
        PercentCommand::Decrease { value, percent } => PercentageQuery::ApplyChange {
            value: parse_decimal("value", value)?,
            percent: parse_decimal("percent", percent)?,
            direction: ChangeDirection::Decrease,
        },
        PercentCommand::Diff { a, b } => PercentageQuery::Difference {
            a: parse_decimal("a", a)?,
            b: parse_decimal("b", b)?,
        },
    })
}

fn rounding_input(args: &RoundArgs) -> CalcResult<RoundingInput> {
    let request = match (args.places, args.figures, &args.nearest) {
        (Some(places), _, _) => RoundingRequest::Decimal { places },
        (_, Some(figures), _) => RoundingRequest::Significant { figures },
        (_, _, Some(multiple)) => RoundingRequest::Nearest {
            multiple: parse_decimal("multiple", multiple)?,
        },
        // clap's ArgGroup guarantees one of the three
        (None, None, None) => return Err(ValidationError::required("places")),
    };
    Ok(RoundingInput {
        value: parse_decimal("value", &args.value)?,
        request,
        mode: choice("mode", &args.mode, RoundingMode::parse)?,
    })
}

fn landscape_input(args: &LandscapeArgs) -> CalcResult<LandscapeInput> {
    let shape = match (&args.length, &args.width, &args.diameter) {
        (Some(length), Some(width), _) => AreaShape::Rectangle {
            length_ft: parse_decimal("length_ft", length)?,
            width_ft: parse_decimal("width_ft", width)?,
        },
        (_, _, Some(diameter)) => AreaShape::Circle {
            diameter_ft: parse_decimal("diameter_ft", diameter)?,
        },
        _ => return Err(ValidationError::required("width_ft")),
    };
    Ok(LandscapeInput {
        shape,
        depth_in: parse_decimal("depth_in", &args.depth)?,
        material: choice("material", &args.material, Material::parse)?,
    })
}

fn password_options(args: &PasswordArgs) -> PasswordOptions {
    PasswordOptions {
        length: args.length,
        uppercase: !args.no_uppercase,
        lowercase: !args.no_lowercase,
        digits: !args.no_digits,
        symbols: !args.no_symbols,
        exclude_similar: args.exclude_similar,
        exclude_ambiguous: args.exclude_ambiguous,
    }
}

// ─── dispatch ────────────────────────────────────────────────────────────────

/// Runs one command and returns the text to print.
pub async fn run(
    cli: &Cli,
    config: &AppConfig,
) -> Result<String> {
    let out = cli.output();
    debug!(command = ?cli.command, "running");

    let text = match &cli.command {
        Command::Gcd { numbers } => app::render(&GcdLcmCalculator::calculate(numbers)?, out)?,
        Command::Primes { number } => app::render(&app::factorization(*number)?, out)?,
        Command::Quadratic { a, b, c } => {
            let input = QuadraticInput {
                a: parse_f64("a", a)?,
                b: parse_f64("b", b)?,
                c: parse_f64("c", c)?,
            };
            app::render(&input.solve()?, out)?
        }
        Command::Round(args) => app::render(&rounding_input(args)?.calculate()?, out)?,
        Command::Percent(command) => app::render(&percent_query(command)?.calculate()?, out)?,
        Command::Sci {
            expressions,
            radians,
        } => {
            let angle_mode = if *radians { AngleMode::Radians } else { AngleMode::Degrees };
            let store = app::open_store(&config.store).await?;
            let evaluations =
                app::evaluate_expressions(&*store, angle_mode, config.history_capacity, expressions)
                    .await?;
            app::render_all(&evaluations, out)?
        }
        Command::History { kind, clear } => {
            let kind = HistoryKind::from(*kind);
            let store = app::open_store(&config.store).await?;
            if *clear {
                app::clear_history(&*store, kind, config.history_capacity).await;
                "history cleared\n".to_string()
            } else {
                let history = app::load_history(&*store, kind, config.history_capacity).await;
                if out.json {
                    serde_json::to_string_pretty(history.entries())?
                } else if history.is_empty() {
                    "history is empty\n".to_string()
                } else {
                    history.entries().iter().map(|e| format!("{e}\n")).collect()
                }
            }
        }
        Command::Confidence {
            mean,
            std_dev,
            n,
            level,
        } => {
            let input = ConfidenceInput {
                mean: parse_f64("mean", mean)?,
                std_dev: parse_f64("std_dev", std_dev)?,
                sample_size: *n,
                level: choice("level", level, ConfidenceLevel::parse)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Interest {
            principal,
            rate,
            years,
            compound,
        } => {
            let input = InterestInput {
                principal: parse_decimal("principal", principal)?,
                annual_rate: parse_decimal("annual_rate", rate)?,
                years: parse_decimal("years", years)?,
                kind: compound_kind(compound)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Mortgage(args) => {
            let input = MortgageInput {
                home_price: parse_decimal("home_price", &args.price)?,
                down_payment: parse_decimal("down_payment", &args.down)?,
                annual_rate: parse_decimal("annual_rate", &args.rate)?,
                term_years: args.term,
                monthly_property_tax: parse_decimal("monthly_property_tax", &args.tax)?,
                monthly_insurance: parse_decimal("monthly_insurance", &args.insurance)?,
                monthly_hoa: parse_decimal("monthly_hoa", &args.hoa)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::MortgageBatch { file } => {
            let scenarios = csv_loader::load_from_path(file)?;
            let outcomes = app::run_mortgage_batch(scenarios);
            if out.json {
                let results: Vec<_> = outcomes
                    .iter()
                    .map(|o| {
                        serde_json::json!({
                            "label": o.label,
                            "result": o.result.as_ref().ok(),
                            "error": o.result.as_ref().err(),
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&results)?
            } else {
                app::batch_summary(&outcomes).to_string()
            }
        }
        Command::RealEstate {
            value,
            rent,
            vacancy,
            expenses,
            debt_service,
            cash,
        } => {
            let input = RealEstateInput {
                property_value: parse_decimal("property_value", value)?,
                gross_annual_rent: parse_decimal("gross_annual_rent", rent)?,
                vacancy_rate: parse_decimal("vacancy_rate", vacancy)?,
                annual_operating_expenses: parse_decimal("annual_operating_expenses", expenses)?,
                annual_debt_service: parse_decimal("annual_debt_service", debt_service)?,
                total_cash_invested: parse_decimal("total_cash_invested", cash)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Rmd {
            age,
            balance,
            growth,
            years,
        } => {
            let input = RmdInput {
                age: *age,
                prior_year_balance: parse_decimal("prior_year_balance", balance)?,
                growth_rate: parse_decimal("growth_rate", growth)?,
                projection_years: *years,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Bmi {
            weight,
            height,
            units,
        } => {
            let input = BmiInput {
                unit_system: choice("unit_system", units, UnitSystem::parse)?,
                weight: parse_f64("weight", weight)?,
                height: parse_f64("height", height)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Bmr {
            sex,
            age,
            weight,
            height,
            units,
            activity,
            goal,
        } => {
            let input = BmrInput {
                sex: choice("sex", sex, Sex::parse)?,
                age: *age,
                unit_system: choice("unit_system", units, UnitSystem::parse)?,
                weight: parse_f64("weight", weight)?,
                height: parse_f64("height", height)?,
                activity: choice("activity", activity, ActivityLevel::parse)?,
                goal: choice("goal", goal, Goal::parse)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Gfr {
            sex,
            age,
            creatinine,
        } => {
            let input = GfrInput {
                sex: choice("sex", sex, Sex::parse)?,
                age: *age,
                creatinine_mg_dl: parse_f64("creatinine", creatinine)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::IdealWeight { sex, height, units } => {
            let input = IdealWeightInput {
                sex: choice("sex", sex, Sex::parse)?,
                unit_system: choice("unit_system", units, UnitSystem::parse)?,
                height: parse_f64("height", height)?,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Btu {
            length,
            width,
            ceiling,
            sun,
            occupants,
            kitchen,
        } => {
            let input = BtuInput {
                length_ft: parse_f64("length_ft", length)?,
                width_ft: parse_f64("width_ft", width)?,
                ceiling_height_ft: parse_f64("ceiling_height_ft", ceiling)?,
                sun: choice("sun", sun, SunExposure::parse)?,
                occupants: *occupants,
                is_kitchen: *kitchen,
            };
            app::render(&input.calculate()?, out)?
        }
        Command::Landscape(args) => app::render(&landscape_input(args)?.calculate()?, out)?,
        Command::Random(args) => {
            let input = RandomInput {
                min: parse_f64("min", &args.min)?,
                max: parse_f64("max", &args.max)?,
                count: args.count,
                decimals: args.decimals,
                distribution: distribution(args)?,
            };
            let result = input.generate()?;
            let store = app::open_store(&config.store).await?;
            app::record(&*store, HistoryKind::Random, config.history_capacity, [result.joined()])
                .await;
            app::render(&result, out)?
        }
        Command::Password(args) => {
            let passwords = password_options(args).generate_many(args.count)?;
            let store = app::open_store(&config.store).await?;
            app::record(
                &*store,
                HistoryKind::Password,
                config.history_capacity,
                passwords.iter().map(|p| p.password.clone()),
            )
            .await;
            app::render_all(&passwords, out)?
        }
        Command::Time(command) => match command {
            TimeCommand::Diff { start, end } => {
                let start = parse_datetime("start", start)?;
                let end = parse_datetime("end", end)?;
                app::render(&time::difference(start, end), out)?
            }
            TimeCommand::Shift {
                start,
                days,
                hours,
                minutes,
                seconds,
                subtract,
            } => {
                let span = TimeSpan {
                    days: *days,
                    hours: *hours,
                    minutes: *minutes,
                    seconds: *seconds,
                };
                let direction = if *subtract { ShiftDirection::Subtract } else { ShiftDirection::Add };
                let start = parse_datetime("start", start)?;
                app::render(&time::shift(start, span, direction)?, out)?
            }
            TimeCommand::Convert { datetime, from, to } => {
                let local = parse_datetime("datetime", datetime)?;
                let result =
                    time::convert_offset(local, parse_f64("from_offset", from)?, parse_f64("to_offset", to)?)?;
                app::render(&result, out)?
            }
        },
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("calc").chain(args.iter().copied()))
            .unwrap_or_else(|e| panic!("failed to parse {args:?}: {e}"))
    }

    async fn run_args(args: &[&str]) -> Result<String> {
        let cli = parse(args);
        run(&cli, &AppConfig::default()).await
    }

    // =========================================================================
    // argument parsing
    // =========================================================================

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["primes", "12", "--json", "--backend", "sqlite"]);

        assert!(cli.json);
        assert_eq!(cli.backend.as_deref(), Some("sqlite"));
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = parse(&["--log-level", "debug", "--db", "x.db", "primes", "7"]);
        let mut config = AppConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.store.connection_string, "x.db");
        assert_eq!(config.store.backend, "memory");
    }

    #[test]
    fn round_requires_a_target() {
        let result = Cli::try_parse_from(["calc", "round", "2.345"]);

        assert!(result.is_err());
    }

    #[test]
    fn gcd_accepts_negative_numbers() {
        let cli = parse(&["gcd", "-12", "18"]);

        assert!(matches!(cli.command, Command::Gcd { ref numbers } if numbers == &vec![-12, 18]));
    }

    // =========================================================================
    // option helpers
    // =========================================================================

    #[test]
    fn compound_simple_and_frequency() {
        assert_eq!(compound_kind("Simple"), Ok(InterestKind::Simple));
        assert_eq!(
            compound_kind("quarterly"),
            Ok(InterestKind::Compound(CompoundFrequency::Quarterly))
        );
        assert_eq!(compound_kind("hourly").unwrap_err().field, "compound");
    }

    #[test]
    fn rounding_input_from_args() {
        let cli = parse(&["round", "23", "--nearest", "5", "--mode", "floor"]);
        let Command::Round(args) = &cli.command else {
            panic!("expected round");
        };

        let input = rounding_input(args).unwrap();

        assert_eq!(input.request, RoundingRequest::Nearest { multiple: dec!(5) });
        assert_eq!(input.mode, RoundingMode::Floor);
    }

    #[test]
    fn normal_distribution_defaults_from_range() {
        let cli = parse(&["random", "--min", "0", "--max", "60", "--mode", "normal"]);
        let Command::Random(args) = &cli.command else {
            panic!("expected random");
        };

        assert_eq!(
            distribution(args),
            Ok(Distribution::Normal { mean: 30.0, std_dev: 10.0 })
        );
    }

    // =========================================================================
    // end to end through run()
    // =========================================================================

    #[tokio::test]
    async fn mortgage_text_report() {
        let text = run_args(&["mortgage", "--price", "250,000", "--down", "50000", "--rate", "6"])
            .await
            .unwrap();

        assert!(text.contains("$1,199.10"));
    }

    #[tokio::test]
    async fn bad_number_names_the_field() {
        let err = run_args(&["mortgage", "--price", "lots", "--down", "0", "--rate", "6"])
            .await
            .unwrap_err();

        let validation = app::validation_error(&err).unwrap();
        assert_eq!(validation.field, "home_price");
        assert_eq!(validation.message, "'lots' is not a valid number");
    }

    #[tokio::test]
    async fn quadratic_json_output() {
        let json = run_args(&["quadratic", "-a", "1", "-b", "-3", "-c", "2", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["discriminant"], serde_json::json!(1.0));
    }

    #[tokio::test]
    async fn percent_of_value() {
        let text = run_args(&["percent", "of", "15", "200"]).await.unwrap();

        assert!(text.contains("15% of 200 = 30"));
    }

    #[tokio::test]
    async fn unknown_option_is_a_validation_error() {
        let err = run_args(&["bmi", "--weight", "70", "--height", "175", "--units", "cubits"])
            .await
            .unwrap_err();

        assert_eq!(app::validation_error(&err).unwrap().field, "unit_system");
    }

    #[tokio::test]
    async fn sci_chains_ans() {
        let text = run_args(&["sci", "2 ^ 3", "ans + 1"]).await.unwrap();

        assert!(text.contains("ans + 1"));
        assert!(text.contains("9"));
    }

    #[tokio::test]
    async fn time_diff_report() {
        let json = run_args(&["time", "diff", "2024-03-01 08:00", "2024-03-03 10:30", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_seconds"], serde_json::json!(181_800));
    }

    #[tokio::test]
    async fn password_batch_json() {
        let json = run_args(&["password", "--length", "12", "--count", "3", "--json"])
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn empty_history_message() {
        let text = run_args(&["history"]).await.unwrap();

        assert_eq!(text, "history is empty\n");
    }
}
