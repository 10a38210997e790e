mod error_formatter;
mod formatter;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use formatter::{ConstraintReport, Formatter, NodeReport};
use kaucher::{
    derive, parse_constraints, parse_expression, Approximation, BoundsEstimator, Interval,
    IntervalCollection, ModalBoundsEstimator, ResourceLimits, Tree,
};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kaucher")]
#[command(about = "Certified output bounds for symbolic models.")]
#[command(
    long_about = "Kaucher bounds the range of a symbolic model over input intervals using modal interval arithmetic.\nThe CLI computes model bounds, checks shape constraints against them, and prints partial derivatives."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bound the output of a model over input ranges
    ///
    /// Prints an interval guaranteed to contain every value the model takes
    /// when each variable ranges over its interval. Repeated occurrences of a
    /// variable are tightened where the model is monotonic in it.
    Bound {
        /// Model expression, e.g. "x * x - x"
        expression: String,
        /// Input ranges (format: name=lo..hi or name=value)
        ///
        /// Examples: x=0..1, y=-inf..0, z=2.5
        #[arg(value_name = "RANGES")]
        ranges: Vec<String>,
        /// Collapse non-monotonic variables to their midpoint instead of
        /// enclosing the whole range
        #[arg(short = 'i', long)]
        inner: bool,
        /// Also show the bound of every subexpression
        #[arg(short = 'n', long)]
        nodes: bool,
        /// Output JSON (for piping to other tools)
        #[arg(short = 'j', long)]
        json: bool,
    },
    /// Check shape constraints against a model
    ///
    /// Each constraint names a target interval for the model output or for a
    /// partial derivative. The violation is how far the certified bound sticks
    /// out of that target; zero means the constraint holds over the ranges.
    ///
    /// Constraint syntax, one per line:
    ///   f in [0 .. 10]
    ///   ∂f/∂x in [0 .. inf], x in [0 .. 1]
    ///   ∂²f/∂x² in [-inf .. 0], weight: 2
    Check {
        /// Model expression, e.g. "x * x - x"
        expression: String,
        /// Input ranges (format: name=lo..hi or name=value)
        #[arg(value_name = "RANGES")]
        ranges: Vec<String>,
        /// File with one constraint per line (# starts a comment)
        #[arg(short = 'f', long = "constraints", value_name = "FILE", conflicts_with = "constraint")]
        file: Option<PathBuf>,
        /// A single constraint; may be repeated
        #[arg(short = 'c', long = "constraint", value_name = "CONSTRAINT")]
        constraint: Vec<String>,
        /// Collapse non-monotonic variables to their midpoint
        #[arg(short = 'i', long)]
        inner: bool,
        /// Output JSON (for piping to other tools)
        #[arg(short = 'j', long)]
        json: bool,
    },
    /// Print the partial derivative of a model
    ///
    /// Useful to see what a derivative constraint is actually bounding.
    Derive {
        /// Model expression, e.g. "x * sin(y)"
        expression: String,
        /// Variable to differentiate with respect to
        variable: String,
        /// Order of the derivative
        #[arg(short = 'o', long, default_value = "1")]
        order: u32,
    },
}

/// Source text attached to an error so parse errors can point into it
#[derive(Debug)]
struct SourceText {
    id: String,
    text: String,
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "In {}", self.id)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaucher=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Bound {
            expression,
            ranges,
            inner,
            nodes,
            json,
        } => bound_command(expression, ranges, *inner, *nodes, *json),
        Commands::Check {
            expression,
            ranges,
            file,
            constraint,
            inner,
            json,
        } => check_command(
            expression,
            ranges,
            file.as_deref(),
            constraint,
            *inner,
            *json,
        ),
        Commands::Derive {
            expression,
            variable,
            order,
        } => derive_command(expression, variable, *order),
    };

    if let Err(e) = result {
        // Bound errors get source-aware formatting, anything else the default
        if let Some(bound_err) = e.downcast_ref::<kaucher::BoundError>() {
            let source = e
                .downcast_ref::<SourceText>()
                .map(|source| (source.id.as_str(), source.text.as_str()));
            eprintln!("{}", error_formatter::format_error(bound_err, source));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn bound_command(
    expression: &str,
    ranges: &[String],
    inner: bool,
    nodes: bool,
    json: bool,
) -> Result<()> {
    let tree = load_expression(expression)?;
    let ranges = parse_ranges(ranges)?;
    let estimator = ModalBoundsEstimator::new().with_approximation(approximation(inner));

    let bound = estimator.get_model_bound(&tree, &ranges)?;
    let node_bounds: Vec<NodeReport> = if nodes {
        let bounds = estimator.get_model_node_bounds(&tree, &ranges)?;
        tree.root()
            .iterate_prefix()
            .into_iter()
            .filter_map(|node| {
                bounds.get(&node.id).map(|bound| NodeReport {
                    id: node.id,
                    expression: node.to_string(),
                    bound: *bound,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let formatter = Formatter::default();
    if json {
        println!(
            "{}",
            formatter.format_bound_json(&tree, estimator.approximation(), &bound, &node_bounds)?
        );
    } else {
        print!("{}", formatter.format_bound(&tree, &bound, &node_bounds));
    }
    Ok(())
}

fn check_command(
    expression: &str,
    ranges: &[String],
    file: Option<&Path>,
    lines: &[String],
    inner: bool,
    json: bool,
) -> Result<()> {
    let tree = load_expression(expression)?;
    let ranges = parse_ranges(ranges)?;

    let source = match file {
        Some(path) => SourceText {
            id: path.display().to_string(),
            text: fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        },
        None if !lines.is_empty() => SourceText {
            id: "<constraints>".to_string(),
            text: lines.join("\n"),
        },
        None => bail!("No constraints given (use --constraints FILE or -c CONSTRAINT)"),
    };
    let limits = ResourceLimits::default();
    let constraints = match parse_constraints(&source.text, &limits) {
        Ok(constraints) => constraints,
        Err(error) => return Err(anyhow::Error::new(error).context(source)),
    };
    if constraints.is_empty() {
        bail!("{} contains no constraints", source.id);
    }

    let estimator = ModalBoundsEstimator::new()
        .with_approximation(approximation(inner))
        .with_limits(limits);
    let violations = estimator.get_constraint_violations(&tree, &ranges, &constraints)?;
    let reports: Vec<ConstraintReport> = constraints
        .iter()
        .zip(violations)
        .map(|(constraint, violation)| ConstraintReport {
            constraint: constraint.to_string(),
            violation,
            weighted_violation: constraint.weight * violation,
        })
        .collect();

    let formatter = Formatter::default();
    if json {
        println!("{}", formatter.format_constraints_json(&reports)?);
    } else {
        print!("{}", formatter.format_constraints(&reports));
    }
    Ok(())
}

fn derive_command(expression: &str, variable: &str, order: u32) -> Result<()> {
    let mut model = load_expression(expression)?;
    for _ in 0..order {
        model = derive(&model, variable)?;
    }
    println!("{}", model);
    Ok(())
}

fn load_expression(expression: &str) -> Result<Tree> {
    parse_expression(expression, &ResourceLimits::default()).map_err(|error| {
        anyhow::Error::new(error).context(SourceText {
            id: "<expression>".to_string(),
            text: expression.to_string(),
        })
    })
}

fn approximation(inner: bool) -> Approximation {
    if inner {
        Approximation::Inner
    } else {
        Approximation::Outer
    }
}

/// Parse "name=lo..hi" or "name=value" arguments into input ranges
fn parse_ranges(ranges: &[String]) -> Result<IntervalCollection> {
    let mut collection = IntervalCollection::new();
    for input in ranges {
        let (name, interval) = parse_range(input)?;
        collection.set_interval(name, interval);
    }
    Ok(collection)
}

fn parse_range(input: &str) -> Result<(String, Interval)> {
    let Some((name, range)) = input.split_once('=') else {
        bail!("Invalid range '{}': expected name=lo..hi", input);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid range '{}': missing variable name", input);
    }

    let interval = match range.split_once("..") {
        Some((lower, upper)) => Interval::new(parse_bound(lower)?, parse_bound(upper)?)?,
        None => Interval::point(parse_bound(range)?),
    };
    Ok((name.to_string(), interval))
}

fn parse_bound(input: &str) -> Result<f64> {
    let value = input
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid bound '{}'", input.trim()))?;
    if value.is_nan() {
        bail!("Invalid bound '{}'", input.trim());
    }
    Ok(value)
}
