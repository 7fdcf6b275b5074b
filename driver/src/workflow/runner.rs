use crate::generator::operands::{build_operands, Operands};
use crate::workflow::config::WorkflowConfig;
use anyhow::{ensure, Context};
use matmulcore::prelude::Multiplier;
use matmulcore::telemetry::{timed, MetricsSnapshot};
use matmulcore::{Matrix, ParallelMultiplier, SequentialMultiplier};
use std::time::Duration;

pub struct WorkflowResult {
    pub lhs: Matrix,
    pub rhs: Matrix,
    pub product: Matrix,
    pub seed: u64,
    pub elapsed: Duration,
    pub sequential_elapsed: Option<Duration>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        self.config.validate().context("validating workflow config")?;
        let seed = self.config.seed.unwrap_or_else(rand::random);

        let Operands { lhs, rhs } = build_operands(
            (self.config.matrix_one_width, self.config.matrix_one_height),
            (self.config.matrix_two_width, self.config.matrix_two_height),
            self.config.random_bound,
            seed,
        )
        .context("building operands")?;

        let multiplier =
            ParallelMultiplier::new(self.config.threads).context("creating multiplier")?;
        let (product, elapsed) = timed("parallel multiply", || multiplier.multiply(&lhs, &rhs));
        let product = product.context("multiplying in parallel")?;

        let sequential_elapsed = if self.config.verify {
            let (reference, seq_elapsed) =
                timed("sequential multiply", || SequentialMultiplier.multiply(&lhs, &rhs));
            let reference = reference.context("multiplying sequentially")?;
            ensure!(
                reference == product,
                "parallel result differs from sequential reference"
            );
            Some(seq_elapsed)
        } else {
            None
        };

        Ok(WorkflowResult {
            lhs,
            rhs,
            product,
            seed,
            elapsed,
            sequential_elapsed,
            metrics: multiplier.metrics().snapshot(),
        })
    }
}
