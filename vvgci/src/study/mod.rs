//! This module implements the data structures included in study scripts.

pub(crate) mod errors;
pub(crate) mod source;

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use vandv::prelude::*;

use crate::study::errors::StudyError;
use crate::study::source::{resolve, MeshSource};

/// Default size count for mesh spacings.
fn default_count() -> MeshKeyword {
  return MeshKeyword::Npoin;
}

/// Where a study gets its three (h, phi) pairs from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum StudyInput {
  /// Spacings and solutions given directly.
  Direct {
    /// Grid spacings, any order.
    h: [f64; 3],
    /// Solutions, paired with `h`.
    phi: [f64; 3]
  },
  /// Spacings from mesh headers, solutions from the final record of each
  /// run's history.
  Runs {
    /// The meshes.
    meshes: MeshSource,
    /// History files, one per mesh, same order.
    histories: Vec<PathBuf>,
    /// The variable to take from each history.
    variable: String,
    /// Which header count gives the spacing.
    #[serde(default = "default_count")]
    count: MeshKeyword
  }
}

/// A single grid convergence study.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Study {
  /// Study name -- must be unique.
  pub(crate) name: String,
  /// Starting order for the apparent order solve.
  #[serde(default)]
  pub(crate) seed: Option<f64>,
  /// The inputs.
  #[serde(flatten)]
  pub(crate) input: StudyInput
}

impl Study {
  /// Gathers the refinement sample, reading any files relative to `base`.
  pub(crate) fn sample(&self, base: &Path) -> Result<RefinementSample, StudyError> {
    return match &self.input {
      StudyInput::Direct { h, phi } => Ok(RefinementSample::from_pairs([
        (h[0], phi[0]),
        (h[1], phi[1]),
        (h[2], phi[2])
      ])),
      StudyInput::Runs { meshes, histories, variable, count } => {
        let meshes = meshes.paths(base)?;
        if meshes.len() != histories.len() {
          return Err(StudyError::Mismatch {
            meshes: meshes.len(),
            histories: histories.len()
          });
        }
        let family = MeshFamily::from_meshes(&meshes, *count)?;
        let mut phi = Vec::with_capacity(histories.len());
        for hist in histories {
          let file = resolve(base, hist);
          let rec = final_values(&file)?;
          let value = rec.get(variable).ok_or_else(|| {
            StudyError::MissingVariable { file: file.clone(), variable: variable.clone() }
          })?;
          debug!("{}: {} = {}", file.display(), variable, value);
          phi.push(value);
        }
        Ok(family.refinement_sample(&phi)?)
      }
    };
  }

  /// Runs the study.
  pub(crate) fn run(&self, base: &Path) -> Result<StudyResult, StudyError> {
    let sample = self.sample(base)?;
    let report = match self.seed {
      Some(seed) => estimate_with_seed(sample.h, sample.phi, seed)?,
      None => sample.estimate()?
    };
    return Ok(StudyResult { name: self.name.clone(), sample, report });
  }
}

/// A vvgci script: a list of studies.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Script {
  /// The studies within this script.
  #[serde(alias = "study")]
  pub(crate) studies: Vec<Study>
}

/// The outcome of a study.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct StudyResult {
  /// Study name.
  pub(crate) name: String,
  /// What went into the estimate.
  pub(crate) sample: RefinementSample,
  /// What came out.
  pub(crate) report: ErrorReport
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_direct_study() {
    let script: Script = toml::from_str(
      r#"
      [[study]]
      name = "lift"
      h = [2.0, 1.0, 1.5]
      phi = [5.863, 6.063, 5.972]
      "#
    ).unwrap();
    assert_eq!(script.studies.len(), 1);
    let res = script.studies[0].run(Path::new(".")).unwrap();
    assert_eq!(res.sample.h, [1.0, 1.5, 2.0]);
    assert_eq!(res.report.error_code(), 0);
  }

  #[test]
  fn test_run_study() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    std::fs::create_dir(dir.join("meshes")).unwrap();
    // second order, refinement ratio of two
    let runs = [(100, 1.5), (400, 1.1), (1600, 1.0)];
    for (i, (n, phi)) in runs.iter().enumerate() {
      std::fs::write(
        dir.join("meshes").join(format!("m{}.su2", i)),
        format!("NDIME= 2\nNPOIN= {}\n", n)
      ).unwrap();
      std::fs::write(
        dir.join(format!("h{}.csv", i)),
        format!("\"Inner_Iter\",\"CL\"\n1, 0.1\n2, {}\n", phi)
      ).unwrap();
    }
    let script: Script = toml::from_str(
      r#"
      [[study]]
      name = "lift"
      variable = "CL"
      meshes = { dir = "meshes" }
      histories = ["h0.csv", "h1.csv", "h2.csv"]

      [[study]]
      name = "drag"
      variable = "CD"
      meshes = ["meshes/m0.su2", "meshes/m1.su2", "meshes/m2.su2"]
      histories = ["h0.csv", "h1.csv", "h2.csv"]
      "#
    ).unwrap();
    let res = script.studies[0].run(dir).unwrap();
    assert_eq!(res.sample.phi, [1.0, 1.1, 1.5]);
    assert_eq!(res.report.error_code(), 0);
    let p = res.report.apparent_order().unwrap();
    assert!((p - 2.0).abs() < 1e-6);
    let err = script.studies[1].run(dir).unwrap_err();
    assert!(matches!(err, StudyError::MissingVariable { .. }));
  }
}
