use crate::workflow::runner::WorkflowResult;
use anyhow::Context;
use matmulcore::telemetry::MetricsSnapshot;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One JSON line appended per run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub lhs_shape: (usize, usize),
    pub rhs_shape: (usize, usize),
    pub threads: usize,
    pub seed: u64,
    pub elapsed_ms: f64,
    pub sequential_ms: Option<f64>,
    pub checksum: i64,
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    pub fn from_result(result: &WorkflowResult, threads: usize) -> Self {
        Self {
            lhs_shape: (result.lhs.height(), result.lhs.width()),
            rhs_shape: (result.rhs.height(), result.rhs.width()),
            threads,
            seed: result.seed,
            elapsed_ms: result.elapsed.as_secs_f64() * 1e3,
            sequential_ms: result.sequential_elapsed.map(|d| d.as_secs_f64() * 1e3),
            checksum: result.product.checksum(),
            metrics: result.metrics,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}x{} * {}x{} on {} threads -> {:.3} ms, checksum {}",
            self.lhs_shape.0,
            self.lhs_shape.1,
            self.rhs_shape.0,
            self.rhs_shape.1,
            self.threads,
            self.elapsed_ms,
            self.checksum
        )
    }

    pub fn append_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let line = serde_json::to_string(self).context("serializing run report")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening report {}", path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    fn sample_report() -> RunReport {
        let mut cfg = WorkflowConfig::from_args((3, 2), (2, 3), 2, 10);
        cfg.seed = Some(1);
        let result = Runner::new(cfg).execute().unwrap();
        RunReport::from_result(&result, 2)
    }

    #[test]
    fn summary_names_shapes_and_threads() {
        let report = sample_report();
        assert!(report.summary().starts_with("2x3 * 3x2 on 2 threads"));
    }

    #[test]
    fn reports_append_one_json_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("report.jsonl");
        let report = sample_report();
        report.append_to(&path).unwrap();
        report.append_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["threads"], 2);
        assert_eq!(parsed["metrics"]["multiplications"], 1);
    }
}
