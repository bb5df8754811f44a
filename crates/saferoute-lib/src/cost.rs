//! Cost function evaluator.
//!
//! Turns an edge plus [`RouteOptimizationOptions`] into a single non-negative
//! traversal cost. Travel time and a convex safety penalty are blended by the
//! caller's safety preference, then contextual multipliers are compounded on
//! top. An optional real-time overlay ([`RealTimeConditions`]) adds traffic,
//! incident, and weather penalties when a [`ConditionsProvider`] has data for
//! the edge.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::{clamp_score, NodeId, RouteEdge};

/// Preference used when a caller supplies a NaN.
const BALANCED_PREFERENCE: f64 = 50.0;

/// Part of the day the trip happens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfTravel {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfTravel {
    /// Baseline multiplier applied to every edge regardless of its score.
    pub fn baseline_multiplier(self) -> f64 {
        match self {
            TimeOfTravel::Morning => 0.95,
            TimeOfTravel::Afternoon => 1.0,
            TimeOfTravel::Evening => 1.1,
            TimeOfTravel::Night => 1.3,
        }
    }
}

impl FromStr for TimeOfTravel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeOfTravel::Morning),
            "afternoon" | "day" => Ok(TimeOfTravel::Afternoon),
            "evening" => Ok(TimeOfTravel::Evening),
            "night" => Ok(TimeOfTravel::Night),
            other => Err(format!("unknown time of travel '{other}'")),
        }
    }
}

impl fmt::Display for TimeOfTravel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TimeOfTravel::Morning => "morning",
            TimeOfTravel::Afternoon => "afternoon",
            TimeOfTravel::Evening => "evening",
            TimeOfTravel::Night => "night",
        };
        f.write_str(value)
    }
}

/// Weather reported for the trip or observed in real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rainy,
    Stormy,
}

impl WeatherCondition {
    /// Multiplier used by the real-time overlay.
    pub fn overlay_multiplier(self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.0,
            WeatherCondition::Cloudy => 1.05,
            WeatherCondition::Rainy => 1.2,
            WeatherCondition::Stormy => 1.5,
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "sunny" => Ok(WeatherCondition::Clear),
            "cloudy" => Ok(WeatherCondition::Cloudy),
            "rainy" | "rain" => Ok(WeatherCondition::Rainy),
            "stormy" | "storm" => Ok(WeatherCondition::Stormy),
            other => Err(format!("unknown weather condition '{other}'")),
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Stormy => "stormy",
        };
        f.write_str(value)
    }
}

/// Deserialize an optional enum, treating unrecognised values as unset.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Options controlling the cost function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptimizationOptions {
    /// 0 minimises time only, 100 maximises safety only.
    pub safety_preference: f64,
    pub avoid_dark_spots: bool,
    pub avoid_low_light_areas: bool,
    pub prefer_cctv_coverage: bool,
    pub prefer_high_population_density: bool,
    pub prefer_police_proximity: bool,
    #[serde(deserialize_with = "lenient_enum")]
    pub time_of_travel: Option<TimeOfTravel>,
    #[serde(deserialize_with = "lenient_enum")]
    pub weather_condition: Option<WeatherCondition>,
}

impl Default for RouteOptimizationOptions {
    fn default() -> Self {
        Self {
            safety_preference: BALANCED_PREFERENCE,
            avoid_dark_spots: false,
            avoid_low_light_areas: false,
            prefer_cctv_coverage: false,
            prefer_high_population_density: false,
            prefer_police_proximity: false,
            time_of_travel: None,
            weather_condition: None,
        }
    }
}

impl RouteOptimizationOptions {
    pub fn with_safety_preference(mut self, preference: f64) -> Self {
        self.safety_preference = preference;
        self
    }

    pub fn with_time_of_travel(mut self, time: TimeOfTravel) -> Self {
        self.time_of_travel = Some(time);
        self
    }

    pub fn with_weather(mut self, weather: WeatherCondition) -> Self {
        self.weather_condition = Some(weather);
        self
    }

    /// Copy of these options with `safety_preference` clamped to 0-100.
    pub fn normalized(&self) -> Self {
        let preference = if self.safety_preference.is_nan() {
            BALANCED_PREFERENCE
        } else {
            self.safety_preference.clamp(0.0, 100.0)
        };
        Self {
            safety_preference: preference,
            ..self.clone()
        }
    }

    /// Multiplier from the contextual flags and conditional time/weather
    /// penalties. Each factor compounds with the others.
    fn contextual_multiplier(&self, score: f64) -> f64 {
        let mut multiplier = 1.0;

        if self.avoid_dark_spots && score < 30.0 {
            multiplier *= 2.0;
        }
        if self.avoid_low_light_areas && score < 50.0 {
            multiplier *= 1.5;
        }
        if self.prefer_cctv_coverage && score > 70.0 {
            multiplier *= 0.9;
        }
        if self.prefer_high_population_density && score > 60.0 {
            multiplier *= 0.95;
        }
        if self.prefer_police_proximity && score > 80.0 {
            multiplier *= 0.9;
        }

        match self.time_of_travel {
            Some(TimeOfTravel::Night) if score < 60.0 => multiplier *= 1.8,
            Some(TimeOfTravel::Evening) if score < 50.0 => multiplier *= 1.4,
            _ => {}
        }

        match self.weather_condition {
            Some(WeatherCondition::Rainy) if score < 70.0 => multiplier *= 1.3,
            Some(WeatherCondition::Stormy) if score < 80.0 => multiplier *= 1.6,
            _ => {}
        }

        multiplier
    }

    /// Smallest value [`Self::contextual_multiplier`] can take for any
    /// score: every enabled discount applied at once.
    pub(crate) fn contextual_floor(&self) -> f64 {
        let mut floor = 1.0;
        if self.prefer_cctv_coverage {
            floor *= 0.9;
        }
        if self.prefer_high_population_density {
            floor *= 0.95;
        }
        if self.prefer_police_proximity {
            floor *= 0.9;
        }
        floor
    }

    pub(crate) fn time_of_day_multiplier(&self) -> f64 {
        self.time_of_travel
            .unwrap_or(TimeOfTravel::Afternoon)
            .baseline_multiplier()
    }
}

/// Convex penalty for an edge's lack of safety, in 0-100.
///
/// Squaring makes a very unsafe edge cost disproportionately more than a
/// moderately unsafe one.
pub fn safety_penalty(safety_score: f64) -> f64 {
    let unsafe_fraction = (100.0 - clamp_score(safety_score)) / 100.0;
    unsafe_fraction * unsafe_fraction * 100.0
}

/// Traversal cost of `edge` under `options`.
pub fn edge_cost(edge: &RouteEdge, options: &RouteOptimizationOptions) -> f64 {
    normalized_cost(edge, &options.normalized())
}

/// Cost under options that already went through [`RouteOptimizationOptions::normalized`].
fn normalized_cost(edge: &RouteEdge, options: &RouteOptimizationOptions) -> f64 {
    let safety_weight = options.safety_preference / 100.0;
    let time_weight = 1.0 - safety_weight;
    let score = clamp_score(edge.safety_score);

    let base = time_weight * edge.travel_time + safety_weight * safety_penalty(score);
    let cost = base
        * options.contextual_multiplier(score)
        * edge.road_type.multiplier()
        * options.time_of_day_multiplier();

    cost.max(0.0)
}

/// A reported incident near an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Severity 0-100. Only incidents above 50 affect cost.
    pub severity: f64,
}

/// Live conditions for an edge, supplied by a [`ConditionsProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealTimeConditions {
    /// Congestion 0-100.
    pub traffic_level: f64,
    pub incidents: Vec<Incident>,
    #[serde(deserialize_with = "lenient_enum")]
    pub weather: Option<WeatherCondition>,
}

impl RealTimeConditions {
    /// Multiplier this overlay applies on top of the base cost.
    pub fn multiplier(&self) -> f64 {
        let traffic = if self.traffic_level.is_nan() {
            0.0
        } else {
            self.traffic_level.clamp(0.0, 100.0)
        };
        let mut multiplier = 1.0 + 0.5 * traffic / 100.0;

        for incident in &self.incidents {
            if incident.severity > 50.0 {
                multiplier *= 1.0 + 2.0 * incident.severity.min(100.0) / 100.0;
            }
        }

        if let Some(weather) = self.weather {
            multiplier *= weather.overlay_multiplier();
        }

        multiplier
    }
}

/// Traversal cost of `edge` including a real-time overlay.
pub fn dynamic_edge_cost(
    edge: &RouteEdge,
    options: &RouteOptimizationOptions,
    conditions: &RealTimeConditions,
) -> f64 {
    (edge_cost(edge, options) * conditions.multiplier()).max(0.0)
}

/// Source of real-time conditions for the dynamic cost overlay.
///
/// Returning `None` for an edge means no live data; the base cost is used.
pub trait ConditionsProvider: fmt::Debug + Send + Sync {
    fn conditions(&self, edge: &RouteEdge) -> Option<&RealTimeConditions>;
}

/// Applies the same conditions to every edge.
#[derive(Debug, Clone, Default)]
pub struct UniformConditions(pub RealTimeConditions);

impl ConditionsProvider for UniformConditions {
    fn conditions(&self, _edge: &RouteEdge) -> Option<&RealTimeConditions> {
        Some(&self.0)
    }
}

/// Conditions reported for individual directed edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeConditions {
    by_edge: HashMap<(NodeId, NodeId), RealTimeConditions>,
}

impl EdgeConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, from: NodeId, to: NodeId, conditions: RealTimeConditions) {
        self.by_edge.insert((from, to), conditions);
    }

    pub fn is_empty(&self) -> bool {
        self.by_edge.is_empty()
    }
}

impl ConditionsProvider for EdgeConditions {
    fn conditions(&self, edge: &RouteEdge) -> Option<&RealTimeConditions> {
        self.by_edge.get(&(edge.from, edge.to))
    }
}

/// Edge weighting used by the search engine.
///
/// Options are normalised once at construction so the per-edge work in the
/// search loop stays small.
#[derive(Debug, Clone)]
pub struct CostModel<'a> {
    options: RouteOptimizationOptions,
    conditions: Option<&'a dyn ConditionsProvider>,
}

impl<'a> CostModel<'a> {
    pub fn new(options: &RouteOptimizationOptions) -> Self {
        Self {
            options: options.normalized(),
            conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: Option<&'a dyn ConditionsProvider>) -> Self {
        self.conditions = conditions;
        self
    }

    /// The normalised options this model weighs edges with.
    pub fn options(&self) -> &RouteOptimizationOptions {
        &self.options
    }

    pub fn cost(&self, edge: &RouteEdge) -> f64 {
        let base = normalized_cost(edge, &self.options);
        match self.conditions.and_then(|provider| provider.conditions(edge)) {
            Some(live) => (base * live.multiplier()).max(0.0),
            None => base,
        }
    }
}
