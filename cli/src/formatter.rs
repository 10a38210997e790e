use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use kaucher::{Approximation, Interval, NodeId, Tree};
use serde::Serialize;

/// Bound of one subexpression of the model
#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub id: NodeId,
    pub expression: String,
    pub bound: Interval,
}

/// Outcome of one shape constraint check
#[derive(Debug, Serialize)]
pub struct ConstraintReport {
    pub constraint: String,
    pub violation: f64,
    pub weighted_violation: f64,
}

#[derive(Serialize)]
struct BoundReport<'a> {
    expression: String,
    approximation: Approximation,
    bound: &'a Interval,
    #[serde(skip_serializing_if = "no_nodes")]
    nodes: &'a [NodeReport],
}

fn no_nodes(nodes: &&[NodeReport]) -> bool {
    nodes.is_empty()
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_bound(&self, tree: &Tree, bound: &Interval, nodes: &[NodeReport]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![Cell::new(format!(
            "{} ∈ {}",
            tree,
            format_interval(bound)
        ))]));

        let mut output = table.to_string();
        output.push('\n');

        if !nodes.is_empty() {
            output.push_str(&self.format_nodes_table(nodes));
            output.push('\n');
        }
        output
    }

    pub fn format_bound_json(
        &self,
        tree: &Tree,
        approximation: Approximation,
        bound: &Interval,
        nodes: &[NodeReport],
    ) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&BoundReport {
            expression: tree.to_string(),
            approximation,
            bound,
            nodes,
        })
    }

    fn format_nodes_table(&self, nodes: &[NodeReport]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Node").set_alignment(CellAlignment::Right),
            Cell::new("Expression").set_alignment(CellAlignment::Left),
            Cell::new("Bound").set_alignment(CellAlignment::Left),
        ]));

        for node in nodes {
            table.add_row(Row::from(vec![
                Cell::new(node.id.index()).set_alignment(CellAlignment::Right),
                Cell::new(&node.expression),
                Cell::new(format_interval(&node.bound)),
            ]));
        }

        table.to_string()
    }

    pub fn format_constraints(&self, reports: &[ConstraintReport]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Constraint").set_alignment(CellAlignment::Left),
            Cell::new("Status").set_alignment(CellAlignment::Left),
            Cell::new("Violation").set_alignment(CellAlignment::Right),
            Cell::new("Weighted").set_alignment(CellAlignment::Right),
        ]));

        for report in reports {
            let status = if report.violation == 0.0 {
                "satisfied"
            } else {
                "violated"
            };
            table.add_row(Row::from(vec![
                Cell::new(&report.constraint),
                Cell::new(status),
                Cell::new(report.violation).set_alignment(CellAlignment::Right),
                Cell::new(report.weighted_violation).set_alignment(CellAlignment::Right),
            ]));
        }

        let total: f64 = reports.iter().map(|report| report.weighted_violation).sum();
        let satisfied = reports.iter().filter(|report| report.violation == 0.0).count();

        let mut output = table.to_string();
        output.push('\n');
        output.push_str(&format!(
            "{} of {} constraints satisfied, total weighted violation: {}\n",
            satisfied,
            reports.len(),
            total
        ));
        output
    }

    pub fn format_constraints_json(&self, reports: &[ConstraintReport]) -> serde_json::Result<String> {
        serde_json::to_string_pretty(reports)
    }
}

fn format_interval(interval: &Interval) -> String {
    if interval.is_undefined() {
        "undefined".to_string()
    } else {
        interval.to_string()
    }
}
