mod benchmarks;
mod result;

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use clap::ValueEnum;
use deltablue_core::asserts::DELTABLUE_ASSERT_LEVEL_DEFINITION;
use deltablue_core::asserts::DELTABLUE_ASSERT_MODERATE;
use deltablue_core::convert_case::Case;
use deltablue_core::options::PlannerOptions;
use deltablue_core::statistics::configure_statistic_logging;
use deltablue_core::Planner;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use result::BenchResult;

use crate::benchmarks::chain_test;
use crate::benchmarks::projection_test;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about
)]
struct Args {
    /// The benchmark to run.
    ///
    /// Possible values: chain, projection, all
    #[arg(short = 'b', long = "benchmark", value_enum, default_value_t, verbatim_doc_comment)]
    benchmark: Benchmark,

    /// The size of the constraint graphs: the length of the chain and the number of projections.
    ///
    /// Possible values: a positive integer
    #[arg(long = "size", default_value_t = 100, value_parser = parse_size, verbatim_doc_comment)]
    size: usize,

    /// How often every selected benchmark is run.
    ///
    /// Possible values: a positive integer
    #[arg(
        short = 'i',
        long = "iterations",
        default_value_t = 1,
        value_parser = parse_size,
        verbatim_doc_comment
    )]
    iterations: usize,

    /// Enables log message output from the planner.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the planner after every run.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Benchmark {
    Chain,
    Projection,
    #[default]
    All,
}

impl Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Benchmark::Chain => write!(f, "chain"),
            Benchmark::Projection => write!(f, "projection"),
            Benchmark::All => write!(f, "all"),
        }
    }
}

impl Benchmark {
    fn selected(self) -> &'static [Benchmark] {
        match self {
            Benchmark::Chain => &[Benchmark::Chain],
            Benchmark::Projection => &[Benchmark::Projection],
            Benchmark::All => &[Benchmark::Chain, Benchmark::Projection],
        }
    }
}

fn parse_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("the value should be at least 1".to_owned()),
        Ok(size) => Ok(size),
        Err(error) => Err(error.to_string()),
    }
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics {
        let _ = configure_statistic_logging(
            "%%%deltablue-stat:",
            Some("%%%deltablue-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> BenchResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    if DELTABLUE_ASSERT_LEVEL_DEFINITION >= DELTABLUE_ASSERT_MODERATE {
        warn!(
            "Potential performance degradation: the DeltaBlue assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            DELTABLUE_ASSERT_LEVEL_DEFINITION
        );
    }

    let options = PlannerOptions {
        variable_capacity: args.size + 3,
        constraint_capacity: 2 * args.size + 2,
        plan_capacity: args.size + 1,
    };

    let mut stdout = std::io::stdout().lock();
    for &benchmark in args.benchmark.selected() {
        let mut total = Duration::ZERO;

        for iteration in 0..args.iterations {
            let mut planner = Planner::with_options(options);
            let start = Instant::now();

            match benchmark {
                Benchmark::Chain => chain_test(&mut planner, args.size)?,
                Benchmark::Projection => projection_test(&mut planner, args.size)?,
                Benchmark::All => unreachable!("'all' is expanded into the individual benchmarks"),
            }

            let elapsed = start.elapsed();
            total += elapsed;
            info!("Iteration {iteration} of the {benchmark} benchmark took {elapsed:?}");

            planner.log_statistics();
        }

        writeln!(
            stdout,
            "{benchmark} (size {}): {} iterations in {total:?}, {:?} per iteration",
            args.size,
            args.iterations,
            total / u32::try_from(args.iterations).unwrap_or(u32::MAX),
        )?;
    }

    Ok(())
}
