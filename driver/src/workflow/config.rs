use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Shapes, thread count and fill parameters for one multiplication run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub matrix_one_width: usize,
    pub matrix_one_height: usize,
    pub matrix_two_width: usize,
    pub matrix_two_height: usize,
    pub threads: usize,
    pub random_bound: i64,
    pub seed: Option<u64>,
    pub verify: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            matrix_one_width: 10,
            matrix_one_height: 5,
            matrix_two_width: 10,
            matrix_two_height: 10,
            threads: 4,
            random_bound: 20,
            seed: None,
            verify: false,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        matrix_one: (usize, usize),
        matrix_two: (usize, usize),
        threads: usize,
        random_bound: i64,
    ) -> Self {
        Self {
            matrix_one_width: matrix_one.0,
            matrix_one_height: matrix_one.1,
            matrix_two_width: matrix_two.0,
            matrix_two_height: matrix_two.1,
            threads,
            random_bound,
            ..Default::default()
        }
    }

    /// Rejects configurations the core would refuse, before anything is allocated.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("matrix_one_width", self.matrix_one_width),
            ("matrix_one_height", self.matrix_one_height),
            ("matrix_two_width", self.matrix_two_width),
            ("matrix_two_height", self.matrix_two_height),
            ("threads", self.threads),
        ] {
            ensure!(value > 0, "{} must be positive", name);
        }
        ensure!(
            self.random_bound >= 2,
            "random_bound must be at least 2, got {}",
            self.random_bound
        );
        ensure!(
            self.matrix_one_width == self.matrix_two_height,
            "matrix one width ({}) must equal matrix two height ({})",
            self.matrix_one_width,
            self.matrix_two_height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_describe_a_valid_run() {
        let cfg = WorkflowConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.random_bound, 20);
    }

    #[test]
    fn from_args_maps_width_then_height() {
        let cfg = WorkflowConfig::from_args((3, 2), (2, 3), 2, 10);
        assert_eq!(cfg.matrix_one_width, 3);
        assert_eq!(cfg.matrix_one_height, 2);
        assert_eq!(cfg.matrix_two_height, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_inputs() {
        let mismatched = WorkflowConfig::from_args((3, 2), (2, 4), 2, 10);
        assert!(mismatched.validate().is_err());
        let no_threads = WorkflowConfig::from_args((3, 2), (2, 3), 0, 10);
        assert!(no_threads.validate().is_err());
        let tiny_bound = WorkflowConfig::from_args((3, 2), (2, 3), 1, 1);
        assert!(tiny_bound.validate().is_err());
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"matrix_one_width: 500\n\
              matrix_one_height: 1000\n\
              matrix_two_width: 300\n\
              matrix_two_height: 500\n\
              threads: 8\n\
              seed: 42\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.matrix_one_height, 1000);
        assert_eq!(cfg.threads, 8);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.random_bound, 20);
        assert!(!cfg.verify);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/nonexistent/workflow.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
