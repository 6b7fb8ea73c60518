//! Colorful console output for model building and solving.
//!
//! Provides a custom `tracing` layer that formats SpatialOpt events with
//! colors. Enabled with the `console` feature.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "spatialopt=info,spatialopt_core=info,spatialopt_models=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default filter. Does nothing if another global subscriber
/// is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SpatialConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!(
        "SpatialOpt v{} - Facility-Location Covering Models",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats SpatialOpt events with colors.
pub struct SpatialConsoleLayer;

impl<S: Subscriber> Layer<S> for SpatialConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        if !metadata.target().starts_with("spatialopt") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    family: Option<String>,
    problem: Option<String>,
    status: Option<String>,
    path: Option<String>,
    error: Option<String>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    demand_count: Option<u64>,
    facility_types: Option<u64>,
    input_count: Option<u64>,
    objective: Option<f64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "family" => self.family = Some(value),
            "problem" => self.problem = Some(value),
            "status" => self.status = Some(value),
            "path" => self.path = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "variable_count" => self.variable_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "demand_count" => self.demand_count = Some(value),
            "facility_types" => self.facility_types = Some(value),
            "input_count" => self.input_count = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "objective" {
            self.objective = Some(value);
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "model_built" => format_model_built(v),
        "model_exported" => format_model_exported(v),
        "problem_solved" => format_problem_solved(v),
        "solver_failed" => format_solver_failed(v),
        "coverages_merged" => format_coverages_merged(v),
        _ if level == Level::WARN => format_line(
            "WARN".yellow().to_string(),
            "[SpatialOpt]",
            v.event.as_deref().unwrap_or("warning").to_string(),
        ),
        _ => String::new(),
    }
}

fn format_line(level: String, tag: &str, body: String) -> String {
    format!(
        "{} {} {} {}",
        timestamp().bright_black(),
        level,
        tag.bright_cyan(),
        body
    )
}

fn count(value: Option<u64>) -> String {
    value
        .unwrap_or(0)
        .to_formatted_string(&Locale::en)
        .bright_yellow()
        .to_string()
}

fn format_model_built(v: &EventVisitor) -> String {
    format_line(
        "INFO".bright_green().to_string(),
        "[Builder]",
        format!(
            "{} model ({}) built: variable count ({}), constraint count ({})",
            v.family.as_deref().unwrap_or("Unknown").white().bold(),
            v.problem.as_deref().unwrap_or("?"),
            count(v.variable_count),
            count(v.constraint_count),
        ),
    )
}

fn format_model_exported(v: &EventVisitor) -> String {
    format_line(
        "INFO".bright_green().to_string(),
        "[Export]",
        format!(
            "{} written to {}",
            v.problem.as_deref().unwrap_or("model").white().bold(),
            v.path.as_deref().unwrap_or("?").bright_magenta()
        ),
    )
}

fn format_problem_solved(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("Unknown");
    let status = if status == "Optimal" {
        status.bright_green().bold().to_string()
    } else {
        status.bright_red().bold().to_string()
    };
    format_line(
        "INFO".bright_green().to_string(),
        "[Solver]",
        format!(
            "{} solved: status ({}), objective ({})",
            v.problem.as_deref().unwrap_or("?").white().bold(),
            status,
            format_objective(v.objective.unwrap_or(0.0)).bright_magenta()
        ),
    )
}

fn format_solver_failed(v: &EventVisitor) -> String {
    format_line(
        "WARN".yellow().to_string(),
        "[Solver]",
        format!(
            "{} failed: {}",
            v.problem.as_deref().unwrap_or("?").white().bold(),
            v.error.as_deref().unwrap_or("unknown error").bright_red()
        ),
    )
}

fn format_coverages_merged(v: &EventVisitor) -> String {
    format_line(
        "INFO".bright_green().to_string(),
        "[Merge]",
        format!(
            "{} coverages merged: facility types ({}), demand count ({})",
            count(v.input_count),
            count(v.facility_types),
            count(v.demand_count),
        ),
    )
}

fn format_objective(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_formatted_string(&Locale::en)
    } else {
        format!("{:.3}", value)
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}
