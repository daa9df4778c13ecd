//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{KSketchArgs, OutputFormat};
use crate::error::Result;
use crate::sketch::{Distance, WeightedVector};

/// Per-fold closest centers of one input point.
#[derive(Debug, Serialize, Deserialize)]
pub struct PointReport {
    pub point: usize,
    pub distances: Vec<Distance>,
}

/// Result structure for the query command.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryReport {
    pub approximate: bool,
    pub rebuilds: u64,
    pub points: Vec<PointReport>,
}

/// Result structure for the weights command.
#[derive(Debug, Serialize, Deserialize)]
pub struct WeightReport {
    pub assigned_points: usize,
    pub folds: Vec<Vec<WeightedVector>>,
}

/// Plain-text rendering for the human output format.
pub trait HumanReadable {
    fn human_lines(&self) -> Vec<String>;
}

impl HumanReadable for QueryReport {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "mode: {} ({} rebuilds)",
            if self.approximate { "approximate" } else { "exact" },
            self.rebuilds
        )];
        for report in &self.points {
            for (fold, distance) in report.distances.iter().enumerate() {
                lines.push(match distance.closest {
                    Some(closest) => format!(
                        "point {} fold {fold}: center {closest} (squared distance {:.6})",
                        report.point, distance.distance
                    ),
                    None => format!("point {} fold {fold}: empty", report.point),
                });
            }
        }
        lines
    }
}

impl HumanReadable for WeightReport {
    fn human_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("assigned points: {}", self.assigned_points)];
        for (fold, weighted) in self.folds.iter().enumerate() {
            for (position, w) in weighted.iter().enumerate() {
                lines.push(format!(
                    "fold {fold} center {position}: weight {} {:?}",
                    w.weight, w.vector.data
                ));
            }
        }
        lines
    }
}

/// Output a result in the selected format.
pub fn output_result<T>(message: &str, result: &T, args: &KSketchArgs) -> Result<()>
where
    T: Serialize + HumanReadable,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            for line in result.human_lines() {
                println!("{line}");
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &KSketchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
