//! Command implementations for the ksketch CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{KSketchError, Result};
use crate::sketch::{ClosestCenterCounts, KSketchIndex, SketchIndexConfig, Vector};

/// Input document: the initial center sets (one per fold) and the points to query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingInput {
    pub centers: Vec<Vec<Vector>>,
    #[serde(default)]
    pub points: Vec<Vector>,
}

impl SeedingInput {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}

/// Execute a CLI command.
pub fn execute_command(args: KSketchArgs) -> Result<()> {
    match &args.command {
        Command::Query(query_args) => {
            let input = SeedingInput::load(&query_args.input)?;
            let report = run_query(&input, query_args)?;
            output_result("Closest centers per fold", &report, &args)
        }
        Command::Weights(query_args) => {
            let input = SeedingInput::load(&query_args.input)?;
            let report = run_weights(&input, query_args)?;
            output_result("Weighted centers per fold", &report, &args)
        }
    }
}

/// Build the index from the input centers, using `--config` when given.
pub fn build_index(input: &SeedingInput, args: &QueryArgs) -> Result<KSketchIndex> {
    match &args.config {
        Some(path) => {
            log::info!("Loading index configuration from {}", path.display());
            index_with_config(input, SketchIndexConfig::load(path)?)
        }
        None => KSketchIndex::from_centers(
            &input.centers,
            args.projection_bits,
            args.projection_samples,
            args.seed,
        ),
    }
}

/// Build the index from an explicit configuration; its fold count must match the input.
pub fn index_with_config(input: &SeedingInput, config: SketchIndexConfig) -> Result<KSketchIndex> {
    if config.num_folds != input.centers.len() {
        return Err(KSketchError::configuration(format!(
            "configuration has {} folds but the input has {} center sets",
            config.num_folds,
            input.centers.len()
        )));
    }

    let mut index = KSketchIndex::new(config)?;
    for (fold, centers) in input.centers.iter().enumerate() {
        for center in centers {
            index.add(center.clone(), fold)?;
        }
    }
    Ok(index)
}

/// Query every input point against every fold, collected into one report.
pub fn run_query(input: &SeedingInput, args: &QueryArgs) -> Result<QueryReport> {
    let mut index = build_index(input, args)?;
    let approx = !args.exact;
    let start = Instant::now();

    let points = input
        .points
        .iter()
        .enumerate()
        .map(|(point, vector)| {
            Ok(PointReport {
                point,
                distances: index.get_distances(&vector.data, approx)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Queried {} points against {} folds in {:?}",
        points.len(),
        index.size(),
        start.elapsed()
    );

    Ok(QueryReport {
        approximate: approx,
        rebuilds: index.rebuild_count(),
        points,
    })
}

/// Weight each center by how many input points it was closest to.
pub fn run_weights(input: &SeedingInput, args: &QueryArgs) -> Result<WeightReport> {
    let mut index = build_index(input, args)?;
    let approx = !args.exact;
    let mut counts = ClosestCenterCounts::new(&index.point_counts());

    for vector in &input.points {
        let distances = index.get_distances(&vector.data, approx)?;
        counts.record(&distances)?;
    }

    Ok(WeightReport {
        assigned_points: input.points.len(),
        folds: index.get_weighted_vectors(&counts)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const INPUT: &str = r#"{
        "centers": [
            [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]],
            [[5.0, 5.0]]
        ],
        "points": [[0.9, 0.1], [-0.8, 0.1], [1.0, 0.0]]
    }"#;

    fn query_args(extra: &[&str]) -> QueryArgs {
        let mut argv = vec!["ksketch", "query", "unused.json"];
        argv.extend_from_slice(extra);
        match KSketchArgs::try_parse_from(argv).unwrap().command {
            Command::Query(args) | Command::Weights(args) => args,
        }
    }

    #[test]
    fn test_input_parsing() {
        let input = SeedingInput::from_json_str(INPUT).unwrap();
        assert_eq!(input.centers.len(), 2);
        assert_eq!(input.centers[0][2].data, vec![-1.0, 0.0]);
        assert_eq!(input.points.len(), 3);

        let no_points = SeedingInput::from_json_str(r#"{"centers": [[[1.0]]]}"#).unwrap();
        assert!(no_points.points.is_empty());

        assert!(matches!(
            SeedingInput::from_json_str("[]"),
            Err(KSketchError::Json(_))
        ));
    }

    #[test]
    fn test_run_query_exact() {
        let input = SeedingInput::from_json_str(INPUT).unwrap();
        let report = run_query(&input, &query_args(&["--exact"])).unwrap();

        assert!(!report.approximate);
        assert_eq!(report.rebuilds, 0);
        assert_eq!(report.points.len(), 3);
        assert_eq!(report.points[0].distances[0].closest, Some(0));
        assert_eq!(report.points[1].distances[0].closest, Some(2));
        assert_eq!(report.points[2].distances[1].closest, Some(0));
    }

    #[test]
    fn test_run_query_approximate_rebuilds_once() {
        let input = SeedingInput::from_json_str(INPUT).unwrap();
        let report = run_query(&input, &query_args(&["--projection-bits", "8"])).unwrap();

        assert!(report.approximate);
        assert_eq!(report.rebuilds, 1);
        // default shortlist covers every fold, so results match exact search
        let exact = run_query(&input, &query_args(&["--exact"])).unwrap();
        for (a, e) in report.points.iter().zip(&exact.points) {
            assert_eq!(a.distances, e.distances);
        }
    }

    #[test]
    fn test_run_weights() {
        let input = SeedingInput::from_json_str(INPUT).unwrap();
        let report = run_weights(&input, &query_args(&["--exact"])).unwrap();

        assert_eq!(report.assigned_points, 3);
        let weights: Vec<f64> = report.folds[0].iter().map(|w| w.weight).collect();
        assert_eq!(weights, vec![2.0, 0.0, 1.0]);
        assert_eq!(report.folds[1][0].weight, 3.0);
    }

    #[test]
    fn test_index_with_config_checks_folds() {
        let input = SeedingInput::from_json_str(INPUT).unwrap();
        let config = SketchIndexConfig::new(3, 2);
        assert!(matches!(
            index_with_config(&input, config),
            Err(KSketchError::Configuration(_))
        ));

        let index = index_with_config(&input, SketchIndexConfig::new(2, 2)).unwrap();
        assert_eq!(index.point_counts(), vec![3, 1]);
    }
}
