//! Output formatting for command results.
//!
//! Every renderer returns a `String` so handlers decide where it goes and
//! tests can inspect it without capturing stdout.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

use saferoute_lib::{BudgetExceededVariant, NodeId, OptimalRoute, RouteAlternatives, RouteSummary};

use crate::terminal::ColorPalette;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Route values as pretty-printed JSON.
    Json,
    /// GeoJSON `FeatureCollection` of route lines.
    Geojson,
}

/// Render a found route and any attached alternatives.
pub fn render_route(
    route: &OptimalRoute,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut buffer = String::new();
            write_summary(&mut buffer, "Route", &route.summary, palette);
            for alt in &route.alternatives {
                buffer.push('\n');
                write_summary(
                    &mut buffer,
                    &format!("Alternative ({})", alt.label),
                    &alt.summary,
                    palette,
                );
            }
            for variant in &route.alternatives_budget_exceeded {
                write_budget_exceeded_variant(
                    &mut buffer,
                    &format!("Alternative ({})", variant.label),
                    variant,
                );
            }
            Ok(buffer)
        }
        OutputFormat::Json => to_json(route),
        OutputFormat::Geojson => to_json(&route.to_geojson()),
    }
}

/// Render the labelled variants produced by the alternatives command.
pub fn render_alternatives(
    alternatives: &RouteAlternatives,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut buffer = String::new();
            for (i, alt) in alternatives.routes.iter().enumerate() {
                if i > 0 {
                    buffer.push('\n');
                }
                write_summary(&mut buffer, &capitalize(&alt.label.to_string()), &alt.summary, palette);
            }
            for variant in &alternatives.budget_exceeded {
                write_budget_exceeded_variant(
                    &mut buffer,
                    &capitalize(&variant.label.to_string()),
                    variant,
                );
            }
            Ok(buffer)
        }
        OutputFormat::Json => to_json(alternatives),
        OutputFormat::Geojson => {
            let features: Vec<_> = alternatives
                .routes
                .iter()
                .map(|alt| alt.summary.to_feature(Some(alt.label)))
                .collect();
            to_json(&json!({ "type": "FeatureCollection", "features": features }))
        }
    }
}

/// Message for a start/goal pair that is not connected.
pub fn render_no_route(from: NodeId, to: NodeId, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("No route found from {from} to {to}\n"),
        OutputFormat::Json | OutputFormat::Geojson => {
            format!("{}\n", json!({ "outcome": "no_route", "from": from, "to": to }))
        }
    }
}

/// Message for a search that ran out of budget.
pub fn render_budget_exceeded(
    from: NodeId,
    to: NodeId,
    expanded: usize,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format!(
            "Search from {from} to {to} stopped after expanding {expanded} nodes; \
             raise the budget to keep searching\n"
        ),
        OutputFormat::Json | OutputFormat::Geojson => format!(
            "{}\n",
            json!({ "outcome": "budget_exceeded", "from": from, "to": to, "expanded": expanded })
        ),
    }
}

/// Summary statistics of a loaded graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphInfo {
    pub nodes: usize,
    /// Directed edges; a two-way street counts twice.
    pub edges: usize,
    pub one_way_edges: usize,
    pub isolated_nodes: Vec<NodeId>,
    pub mean_edge_safety: Option<f64>,
    pub road_types: BTreeMap<String, usize>,
}

pub fn render_info(info: &GraphInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut buffer = String::new();
            let _ = writeln!(buffer, "Nodes: {}", info.nodes);
            let _ = writeln!(
                buffer,
                "Edges: {} ({} one-way)",
                info.edges, info.one_way_edges
            );
            if let Some(mean) = info.mean_edge_safety {
                let _ = writeln!(buffer, "Mean edge safety: {mean:.1}");
            }
            if !info.isolated_nodes.is_empty() {
                let ids: Vec<String> = info.isolated_nodes.iter().map(ToString::to_string).collect();
                let _ = writeln!(buffer, "Isolated nodes: {}", ids.join(", "));
            }
            for (road_type, count) in &info.road_types {
                let _ = writeln!(buffer, "  {road_type}: {count}");
            }
            Ok(buffer)
        }
        OutputFormat::Json | OutputFormat::Geojson => to_json(info),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut rendered =
        serde_json::to_string_pretty(value).context("failed to serialize output as JSON")?;
    rendered.push('\n');
    Ok(rendered)
}

fn write_summary(buffer: &mut String, title: &str, summary: &RouteSummary, palette: &ColorPalette) {
    let safety_color = palette.for_safety(summary.average_safety_score);
    let _ = writeln!(
        buffer,
        "{bold}{title}{reset}: {} hops, {:.0} m, {:.0} s, safety {safety_color}{:.1}{reset}",
        summary.hop_count(),
        summary.total_distance,
        summary.total_time,
        summary.average_safety_score,
        bold = palette.white_bold,
        reset = palette.reset,
    );

    let factors = &summary.safety_factors;
    let _ = writeln!(
        buffer,
        "  {gray}factors: lighting {:.1}, footfall {:.1}, hazards {:.1}, proximity {:.1}{reset}",
        factors.lighting,
        factors.footfall,
        factors.hazards,
        factors.proximity,
        gray = palette.gray,
        reset = palette.reset,
    );

    let path: Vec<String> = summary.path.iter().map(ToString::to_string).collect();
    let _ = writeln!(buffer, "  path: {}", path.join(" -> "));

    for segment in &summary.segments {
        let _ = writeln!(
            buffer,
            "    {} -> {}  {:<11} {:>6.0} m {:>5.0} s  safety {}{:.1}{}",
            segment.from,
            segment.to,
            segment.road_type.to_string(),
            segment.distance,
            segment.travel_time,
            palette.for_safety(segment.safety_score),
            segment.safety_score,
            palette.reset,
        );
    }
}

fn write_budget_exceeded_variant(buffer: &mut String, title: &str, variant: &BudgetExceededVariant) {
    let _ = writeln!(
        buffer,
        "{title}: stopped after expanding {} nodes",
        variant.expanded
    );
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
