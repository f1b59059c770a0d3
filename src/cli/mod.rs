//! `cadence_cli` command parsing and dispatch.

pub mod help;
pub mod output;
pub mod render;

use std::{collections::BTreeSet, path::PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use cadence_config::ConfigManager;
use cadence_core::{CashFlowForecast, FixedClock, SkippedRule};
use cadence_domain::{CashFlowPoint, EventType, ForecastTotals};
use cadence_storage_json::JsonStore;

use crate::{
    errors::{CadenceError, Result},
    utils::build_info,
    Planner,
};

/// Flags shared by the data commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub days: Option<u32>,
    pub today: Option<NaiveDate>,
    pub types: Option<BTreeSet<EventType>>,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Forecast { data_dir: PathBuf, options: Options },
    Timeline { data_dir: PathBuf, options: Options },
    Rules { data_dir: PathBuf, options: Options },
    Version { json: bool },
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Err(CadenceError::InvalidInput("no command given".into()));
        };
        match name.as_str() {
            "forecast" | "timeline" | "rules" => {
                let (data_dir, flags) = rest.split_first().ok_or_else(|| {
                    CadenceError::InvalidInput(format!("`{name}` needs a data directory"))
                })?;
                if data_dir.starts_with("--") {
                    return Err(CadenceError::InvalidInput(format!(
                        "`{name}` needs a data directory before `{data_dir}`"
                    )));
                }
                let data_dir = PathBuf::from(data_dir);
                let options = parse_options(flags)?;
                if options.types.is_some() && name != "timeline" {
                    return Err(CadenceError::InvalidInput(
                        "`--types` only applies to `timeline`".into(),
                    ));
                }
                Ok(match name.as_str() {
                    "forecast" => Command::Forecast { data_dir, options },
                    "timeline" => Command::Timeline { data_dir, options },
                    _ => Command::Rules { data_dir, options },
                })
            }
            "version" | "--version" | "-V" => {
                let options = parse_options(rest)?;
                Ok(Command::Version { json: options.json })
            }
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(CadenceError::InvalidInput(format!("unknown command `{other}`"))),
        }
    }
}

fn parse_options(flags: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--json" => options.json = true,
            "--days" | "--today" | "--types" => {
                let value = iter.next().ok_or_else(|| {
                    CadenceError::InvalidInput(format!("`{flag}` needs a value"))
                })?;
                match flag.as_str() {
                    "--days" => options.days = Some(parse_days(value)?),
                    "--today" => options.today = Some(parse_date(value)?),
                    _ => options.types = Some(parse_types(value)?),
                }
            }
            other => {
                return Err(CadenceError::InvalidInput(format!("unknown option `{other}`")))
            }
        }
    }
    Ok(options)
}

fn parse_days(value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| CadenceError::InvalidInput(format!("`{value}` is not a number of days")))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CadenceError::InvalidInput(format!("`{value}` is not a date in YYYY-MM-DD form"))
    })
}

fn parse_types(value: &str) -> Result<BTreeSet<EventType>> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<EventType>().map_err(CadenceError::InvalidInput))
        .collect()
}

/// Parses `args` (without the program name) and runs the command.
pub fn run(args: &[String]) -> Result<()> {
    let command = match Command::parse(args) {
        Ok(command) => command,
        Err(err) => {
            eprint!("{}", help::usage());
            return Err(err);
        }
    };
    match command {
        Command::Help => {
            print!("{}", help::usage());
            Ok(())
        }
        Command::Version { json } => {
            let meta = build_info::current();
            if json {
                println!("{}", serde_json::to_string_pretty(&meta)?);
            } else {
                println!("{}", meta.summary());
                println!("rustc: {}", meta.rustc);
            }
            Ok(())
        }
        Command::Forecast { data_dir, options } => {
            let planner = open_planner(data_dir, &options)?;
            let forecast = planner.forecast(options.days)?;
            report_skipped(&forecast.skipped);
            if options.json {
                println!("{}", serde_json::to_string_pretty(&ForecastReport::from(&forecast))?);
            } else {
                output::section(format!(
                    "Cash flow from {} over {} day(s)",
                    forecast.today, forecast.horizon_days
                ));
                print!("{}", render::forecast_table(&forecast, &planner.amount_format()));
            }
            Ok(())
        }
        Command::Timeline { data_dir, options } => {
            let planner = open_planner(data_dir, &options)?;
            let timeline = planner.upcoming(options.days, options.types.as_ref())?;
            report_skipped(&timeline.skipped);
            if options.json {
                println!("{}", serde_json::to_string_pretty(&timeline.events)?);
            } else {
                output::section(format!("Timeline from {}", planner.today()));
                print!("{}", render::timeline_list(&timeline, &planner.amount_format()));
            }
            Ok(())
        }
        Command::Rules { data_dir, options } => {
            let planner = open_planner(data_dir, &options)?;
            let summaries = planner.rule_summaries()?;
            output::section(format!("Recurring rules as of {}", planner.today()));
            print!("{}", render::rules_table(&summaries, &planner.amount_format()));
            Ok(())
        }
    }
}

/// Reads the config (`<data-dir>/config.json`, else the per-user one, else
/// defaults) and the JSON store in an existing data directory.
fn open_planner(data_dir: PathBuf, options: &Options) -> Result<Planner> {
    if !data_dir.is_dir() {
        return Err(CadenceError::InvalidInput(format!(
            "data directory `{}` does not exist",
            data_dir.display()
        )));
    }
    let manager = ConfigManager::for_data_dir(&data_dir);
    tracing::debug!(path = %manager.config_path().display(), "loading config");
    let config = manager.load()?;
    output::set_color_enabled(config.ui_color_enabled);
    let store = JsonStore::new(data_dir)?;
    let planner = Planner::with_json_store(store, config);
    Ok(match options.today {
        Some(today) => planner.with_clock(FixedClock::new(today)),
        None => planner,
    })
}

fn report_skipped(skipped: &[SkippedRule]) {
    for rule in skipped {
        output::warning(format!("skipped rule `{}`: {}", rule.description, rule.error));
    }
}

#[derive(Serialize)]
struct ForecastReport<'a> {
    today: NaiveDate,
    horizon_days: u32,
    points: &'a [CashFlowPoint],
    totals: &'a ForecastTotals,
    skipped: Vec<String>,
}

impl<'a> From<&'a CashFlowForecast> for ForecastReport<'a> {
    fn from(forecast: &'a CashFlowForecast) -> Self {
        Self {
            today: forecast.today,
            horizon_days: forecast.horizon_days,
            points: &forecast.points,
            totals: &forecast.totals,
            skipped: forecast
                .skipped
                .iter()
                .map(|rule| rule.error.to_string())
                .collect(),
        }
    }
}
