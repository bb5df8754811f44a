//! Route and alternatives command handlers.

use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use saferoute_lib::{
    NodeId, RouteOptimizationOptions, RoutePlanOutcome, RouteRequest, SearchBudget,
    TimeOfTravel, WeatherCondition,
};

use crate::commands::load_engine;
use crate::output::{
    render_alternatives, render_budget_exceeded, render_no_route, render_route, OutputFormat,
};
use crate::terminal::ColorPalette;

/// Exit status when start and goal are not connected.
pub const EXIT_NO_ROUTE: u8 = 2;
/// Exit status when the search budget ran out first.
pub const EXIT_BUDGET_EXCEEDED: u8 = 3;

/// Arguments shared by the route and alternatives commands.
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Starting node id.
    #[arg(long = "from", allow_negative_numbers = true)]
    pub from: NodeId,
    /// Destination node id.
    #[arg(long = "to", allow_negative_numbers = true)]
    pub to: NodeId,
    /// Safety preference: 0 minimises travel time, 100 maximises safety.
    #[arg(long, default_value_t = 50.0)]
    pub safety: f64,
    /// Heavily penalise segments scored below 30.
    #[arg(long)]
    pub avoid_dark_spots: bool,
    /// Penalise segments scored below 50.
    #[arg(long)]
    pub avoid_low_light: bool,
    /// Favour well-rated segments as a proxy for camera coverage.
    #[arg(long)]
    pub prefer_cctv: bool,
    /// Favour well-rated segments as a proxy for busy streets.
    #[arg(long)]
    pub prefer_populated: bool,
    /// Favour the best-rated segments as a proxy for nearby help.
    #[arg(long)]
    pub prefer_police: bool,
    /// Time of travel: morning, afternoon, evening or night. Other values
    /// are ignored.
    #[arg(long)]
    pub time: Option<String>,
    /// Weather: clear, cloudy, rainy or stormy. Other values are ignored.
    #[arg(long)]
    pub weather: Option<String>,
    /// Maximum number of node expansions per search.
    #[arg(long)]
    pub max_expansions: Option<usize>,
}

impl RouteArgs {
    pub fn to_options(&self) -> RouteOptimizationOptions {
        RouteOptimizationOptions {
            safety_preference: self.safety,
            avoid_dark_spots: self.avoid_dark_spots,
            avoid_low_light_areas: self.avoid_low_light,
            prefer_cctv_coverage: self.prefer_cctv,
            prefer_high_population_density: self.prefer_populated,
            prefer_police_proximity: self.prefer_police,
            time_of_travel: lenient::<TimeOfTravel>("time", self.time.as_deref()),
            weather_condition: lenient::<WeatherCondition>("weather", self.weather.as_deref()),
        }
    }

    pub fn to_request(&self, include_alternatives: bool) -> RouteRequest {
        let mut request = RouteRequest::new(self.from, self.to)
            .with_options(self.to_options())
            .with_alternatives(include_alternatives);
        if let Some(limit) = self.max_expansions {
            request = request.with_budget(SearchBudget::unlimited().with_max_expansions(limit));
        }
        request
    }
}

/// Parse an optional enum flag, falling back to the neutral multiplier on
/// values the cost model does not know.
fn lenient<T: FromStr<Err = String>>(flag: &str, value: Option<&str>) -> Option<T> {
    let raw = value?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            tracing::warn!(flag, value = raw, %reason, "ignoring unrecognised value");
            None
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    graph_path: &Path,
    format: OutputFormat,
    args: &RouteArgs,
    include_alternatives: bool,
) -> Result<ExitCode> {
    let engine = load_engine(graph_path)?;
    let request = args.to_request(include_alternatives);

    let outcome = engine
        .plan(&request)
        .with_context(|| format!("cannot route from {} to {}", args.from, args.to))?;

    match outcome {
        RoutePlanOutcome::Found(route) => {
            print!("{}", render_route(&route, format, &ColorPalette::detect())?);
            Ok(ExitCode::SUCCESS)
        }
        RoutePlanOutcome::NoRoute => {
            print!("{}", render_no_route(args.from, args.to, format));
            Ok(ExitCode::from(EXIT_NO_ROUTE))
        }
        RoutePlanOutcome::BudgetExceeded { expanded } => {
            print!(
                "{}",
                render_budget_exceeded(args.from, args.to, expanded, format)
            );
            Ok(ExitCode::from(EXIT_BUDGET_EXCEEDED))
        }
    }
}

/// Handle the alternatives subcommand.
///
/// Variants that ran out of budget are reported after the found ones. When
/// every variant ran out of budget the command exits as a budget-limited
/// route does, so callers can retry with a larger budget.
pub fn handle_alternatives_command(
    graph_path: &Path,
    format: OutputFormat,
    args: &RouteArgs,
) -> Result<ExitCode> {
    let engine = load_engine(graph_path)?;
    let request = args.to_request(false);

    let alternatives = saferoute_lib::generate_route_alternatives(
        &engine.snapshot(),
        &request,
        engine.config(),
    )
    .with_context(|| format!("cannot route from {} to {}", args.from, args.to))?;

    if alternatives.is_no_route() {
        print!("{}", render_no_route(args.from, args.to, format));
        return Ok(ExitCode::from(EXIT_NO_ROUTE));
    }
    if alternatives.is_budget_limited() {
        print!(
            "{}",
            render_budget_exceeded(args.from, args.to, alternatives.max_expanded(), format)
        );
        return Ok(ExitCode::from(EXIT_BUDGET_EXCEEDED));
    }

    print!(
        "{}",
        render_alternatives(&alternatives, format, &ColorPalette::detect())?
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        args: RouteArgs,
    }

    fn parse(argv: &[&str]) -> RouteArgs {
        let mut full = vec!["harness"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).expect("valid arguments").args
    }

    #[test]
    fn defaults_to_balanced_options() {
        let args = parse(&["--from", "1", "--to", "4"]);
        assert_eq!(args.to_options(), RouteOptimizationOptions::default());

        let request = args.to_request(false);
        assert!(request.budget.is_none());
        assert!(!request.include_alternatives);
    }

    #[test]
    fn maps_flags_to_options() {
        let args = parse(&[
            "--from",
            "-7",
            "--to",
            "4",
            "--safety",
            "80",
            "--avoid-dark-spots",
            "--prefer-police",
            "--time",
            "night",
            "--weather",
            "Rainy",
            "--max-expansions",
            "500",
        ]);
        let options = args.to_options();

        assert_eq!(args.from, -7);
        assert_eq!(options.safety_preference, 80.0);
        assert!(options.avoid_dark_spots);
        assert!(options.prefer_police_proximity);
        assert!(!options.prefer_cctv_coverage);
        assert_eq!(options.time_of_travel, Some(TimeOfTravel::Night));
        assert_eq!(options.weather_condition, Some(WeatherCondition::Rainy));

        let request = args.to_request(true);
        assert_eq!(request.budget.unwrap().max_expansions, Some(500));
        assert!(request.include_alternatives);
    }

    #[test]
    fn unknown_time_and_weather_are_neutral() {
        let args = parse(&["--from", "1", "--to", "2", "--time", "dusk", "--weather", "hail"]);
        let options = args.to_options();

        assert_eq!(args.time.as_deref(), Some("dusk"));
        assert_eq!(options.time_of_travel, None);
        assert_eq!(options.weather_condition, None);
        assert_eq!(options, RouteOptimizationOptions::default());
    }
}
