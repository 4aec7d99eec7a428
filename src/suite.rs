use log::{debug, info};

use crate::error::{Error, Result};
use crate::harness::{BenchConfig, Clock, Harness};
use crate::schema::Measurement;
use crate::targets::{Benchmark, Target, SUITE};
use rand::Rng;

/// Measures every target in `SUITE`, in order.
pub fn run(cfg: &BenchConfig) -> Result<Vec<Measurement>> {
    let mut harness = cfg.harness();
    run_with(&mut harness, &SUITE, cfg.trials())
}

pub fn run_with<R: Rng, C: Clock>(
    harness: &mut Harness<R, C>,
    benchmarks: &[Benchmark],
    trials: u64,
) -> Result<Vec<Measurement>> {
    info!(
        "measuring {} targets, {} trials each ({} accumulation)",
        benchmarks.len(),
        trials,
        harness.accumulation().as_str()
    );

    let mut out = Vec::with_capacity(benchmarks.len());
    for bench in benchmarks {
        let measured = match bench.target {
            Target::Unary(f) => harness.measure_unary(f, trials),
            Target::Binary(f) => harness.measure_binary(f, trials),
        }
        .map_err(|source| Error::Harness {
            target: bench.label,
            source,
        })?;

        debug!("{}: {:.3} ns/call", bench.label, measured.mean_ns);

        out.push(Measurement {
            name: bench.label.to_string(),
            unit: "ns/call".to_string(),
            arity: bench.target.arity(),
            trials: measured.trials,
            total_ns: measured.total_ns,
            mean_ns: measured.mean_ns,
        });
    }

    Ok(out)
}
