//! Engine configuration.
//!
//! # Environment Variables
//!
//! - `SAFEROUTE_HEURISTIC`: `cost_scaled` (default), `geographic`, or `none`
//! - `SAFEROUTE_MAX_EXPANSIONS`: node expansion limit per search
//! - `SAFEROUTE_MAX_SEARCH_MS`: wall-clock limit per search in milliseconds
//! - `SAFEROUTE_PARALLEL_ALTERNATIVES`: `true` (default) or `false`

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristic::HeuristicMode;
use crate::path::SearchBudget;

const ENV_HEURISTIC: &str = "SAFEROUTE_HEURISTIC";
const ENV_MAX_EXPANSIONS: &str = "SAFEROUTE_MAX_EXPANSIONS";
const ENV_MAX_SEARCH_MS: &str = "SAFEROUTE_MAX_SEARCH_MS";
const ENV_PARALLEL_ALTERNATIVES: &str = "SAFEROUTE_PARALLEL_ALTERNATIVES";

/// Settings shared by every query an engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub heuristic: HeuristicMode,
    /// Default budget for requests that do not carry their own.
    pub budget: SearchBudget,
    /// Run the three alternative searches concurrently.
    pub parallel_alternatives: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicMode::default(),
            budget: SearchBudget::unlimited(),
            parallel_alternatives: true,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HEURISTIC) {
            config.heuristic = parse_value(ENV_HEURISTIC, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_EXPANSIONS) {
            config.budget.max_expansions = Some(parse_value(ENV_MAX_EXPANSIONS, &value)?);
        }
        if let Some(value) = lookup(ENV_MAX_SEARCH_MS) {
            config.budget.max_duration_ms = Some(parse_value(ENV_MAX_SEARCH_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_PARALLEL_ALTERNATIVES) {
            config.parallel_alternatives = parse_value(ENV_PARALLEL_ALTERNATIVES, &value)?;
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.heuristic, HeuristicMode::CostScaled);
        assert!(config.parallel_alternatives);
    }

    #[test]
    fn reads_budget_and_heuristic() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SAFEROUTE_HEURISTIC", "geographic"),
            ("SAFEROUTE_MAX_EXPANSIONS", "5000"),
            ("SAFEROUTE_MAX_SEARCH_MS", " 250 "),
            ("SAFEROUTE_PARALLEL_ALTERNATIVES", "false"),
        ]))
        .unwrap();

        assert_eq!(config.heuristic, HeuristicMode::Geographic);
        assert_eq!(config.budget.max_expansions, Some(5000));
        assert_eq!(config.budget.max_duration_ms, Some(250));
        assert!(!config.parallel_alternatives);
    }

    #[test]
    fn malformed_value_is_reported() {
        let error = EngineConfig::from_lookup(lookup_from(&[("SAFEROUTE_MAX_EXPANSIONS", "lots")]))
            .expect_err("not a number");
        assert!(format!("{error}").contains("SAFEROUTE_MAX_EXPANSIONS"));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"budget": {"max_expansions": 10}}"#).unwrap();
        assert_eq!(config.budget.max_expansions, Some(10));
        assert_eq!(config.heuristic, HeuristicMode::CostScaled);
    }
}
