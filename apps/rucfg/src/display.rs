//! Output rendering and formatting

use crate::setup::{ApplyReport, RecordOutcome, UnitLimits};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Render the outcome of `rucfg apply`
    pub fn render_apply_report(&self, report: &ApplyReport) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        self.render_outcomes(&report.outcomes);
        self.render_units(&report.units);
        Ok(())
    }

    /// Render a resource-unit key
    pub fn render_key(&self, key: &str) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::json!({ "key": key });
            println!("{json}");
        } else {
            println!("{key}");
        }
        Ok(())
    }

    fn render_outcomes(&self, outcomes: &[RecordOutcome]) {
        if outcomes.is_empty() {
            println!("No changes applied.");
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Cluster").add_attribute(Attribute::Bold),
            Cell::new("Tenant").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
        ]);

        for outcome in outcomes {
            table.add_row(vec![
                Cell::new(outcome.index),
                Cell::new(&outcome.cluster),
                Cell::new(&outcome.tenant),
                Cell::new(outcome.kind),
                self.format_result(outcome),
            ]);
        }

        println!("{table}");
    }

    fn format_result(&self, outcome: &RecordOutcome) -> Cell {
        match (&outcome.error, outcome.committed) {
            (Some(error), _) => Cell::new(error).fg(Color::Red),
            (None, true) => Cell::new("committed").fg(Color::Green),
            (None, false) => Cell::new("rolled back").fg(Color::Yellow),
        }
    }

    fn render_units(&self, units: &[UnitLimits]) {
        if units.is_empty() {
            println!("No resource units configured.");
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Cluster").add_attribute(Attribute::Bold),
            Cell::new("Tenant").add_attribute(Attribute::Bold),
            Cell::new("Max connections").add_attribute(Attribute::Bold),
            Cell::new("CPU").add_attribute(Attribute::Bold),
        ]);

        for unit in units {
            let connections = unit
                .max_connections
                .map_or_else(|| "-".to_string(), |limit| limit.to_string());
            let cpu = unit
                .cpu
                .map_or_else(|| "-".to_string(), |quota| quota.to_string());

            table.add_row(vec![
                Cell::new(&unit.cluster),
                Cell::new(&unit.tenant),
                Cell::new(connections),
                Cell::new(cpu),
            ]);
        }

        println!("{table}");
    }
}
