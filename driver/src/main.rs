use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::report::RunReport;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Multiply two random integer matrices across worker threads")]
struct Args {
    /// Load a workflow config from YAML instead of the size flags
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    m1_width: usize,
    #[arg(long, default_value_t = 5)]
    m1_height: usize,
    #[arg(long, default_value_t = 10)]
    m2_width: usize,
    #[arg(long, default_value_t = 10)]
    m2_height: usize,
    #[arg(short, long, default_value_t = 4)]
    threads: usize,
    /// Exclusive upper bound for random fill values
    #[arg(long, default_value_t = 20)]
    bound: i64,
    #[arg(long)]
    seed: Option<u64>,
    /// Also run the single-threaded kernel and compare results
    #[arg(long, default_value_t = false)]
    verify: bool,
    /// Print both operands and the product
    #[arg(long, default_value_t = false)]
    print: bool,
    /// Append a JSON summary line to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            (args.m1_width, args.m1_height),
            (args.m2_width, args.m2_height),
            args.threads,
            args.bound,
        )
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.verify |= args.verify;

    let threads = config.threads;
    let result = Runner::new(config).execute()?;

    if args.print {
        println!("MATRIX #1:\n{}", result.lhs);
        println!("MATRIX #2:\n{}", result.rhs);
        println!("RESULT:\n{}", result.product);
    }

    let report = RunReport::from_result(&result, threads);
    println!("{}", report.summary());
    if let Some(ms) = report.sequential_ms {
        println!("sequential reference matched in {:.3} ms", ms);
    }
    if let Some(path) = args.report {
        report
            .append_to(&path)
            .with_context(|| format!("recording run in {}", path.display()))?;
    }

    Ok(())
}
