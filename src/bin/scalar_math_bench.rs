use clap::{Parser, ValueEnum};
use log::{error, info};
use scalar_math_bench::harness::{Accumulation, BenchConfig, Profile};
use scalar_math_bench::report::{self, Destination, ReportFormat};
use scalar_math_bench::schema::{self, BenchReport, RunMeta, SCHEMA_VERSION};
use scalar_math_bench::suite;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    /// 1,000,000 trials per operation.
    Quick,
    /// 100,000,000 trials per operation.
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "scalar-math-bench")]
#[command(about = "Average per-call latency of scalar f32 math operations")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Full)]
    profile: ProfileArg,

    /// Trials per operation; overrides the profile.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    trials: Option<u64>,

    /// Seed for the input generator. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Accumulation::Streaming)]
    accumulation: Accumulation,

    #[arg(long, value_enum, default_value_t = ReportFormat::Latex)]
    format: ReportFormat,

    /// Where to write the report; `-` prints to stdout.
    #[arg(long, default_value = "Benchmark.txt")]
    out: PathBuf,
}

fn run(args: Args) -> scalar_math_bench::Result<()> {
    let cfg = BenchConfig {
        profile: args.profile.into(),
        trials: args.trials,
        seed: args.seed,
        accumulation: args.accumulation,
    };

    // Fail on an unusable destination before spending time measuring.
    let dest = Destination::open(&args.out)?;

    info!("Running {}...", env!("CARGO_PKG_NAME"));

    let measurements = suite::run(&cfg)?;

    let report = BenchReport {
        run: RunMeta {
            schema_version: SCHEMA_VERSION,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: cfg.profile.as_str().to_string(),
            trials: cfg.trials(),
            seed: cfg.seed,
            accumulation: cfg.accumulation,
            timestamp_unix: schema::unix_timestamp(),
            git_sha: schema::git_sha_short(),
        },
        measurements,
    };

    let rendered = report::render(&report, args.format)?;
    dest.write(&rendered)
}

/// Reports a fatal error on `stderr`, independent of the log filter.
fn report_failure(err: &scalar_math_bench::Error, stderr: &mut impl Write) {
    error!("{err}");
    let _ = writeln!(stderr, "[Error] {err}. Exiting...");
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}
