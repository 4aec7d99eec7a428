//! Per-call latency measurement for scalar functions.
//!
//! Every trial draws its random input(s) first, then reads the clock, calls
//! the target once and reads the clock again. Only the call itself sits
//! inside the timed window.

use std::hint::black_box;
use std::time::Instant;

use clap::ValueEnum;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    #[error("trial count must be at least 1")]
    ZeroTrials,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn trials(&self) -> u64 {
        match self {
            Profile::Quick => 1_000_000,
            Profile::Full => 100_000_000,
        }
    }
}

/// How per-trial durations are folded into the mean.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accumulation {
    /// `mean += elapsed / n` on every trial.
    #[default]
    Streaming,
    /// Exact integer sum, divided once at the end.
    SumThenDivide,
}

impl Accumulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accumulation::Streaming => "streaming",
            Accumulation::SumThenDivide => "sum-then-divide",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    /// Overrides the profile's trial count when set.
    pub trials: Option<u64>,
    /// Fixed seed for reproducible inputs; OS entropy otherwise.
    pub seed: Option<u64>,
    pub accumulation: Accumulation,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Full,
            trials: None,
            seed: None,
            accumulation: Accumulation::Streaming,
        }
    }
}

impl BenchConfig {
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials.unwrap_or_else(|| self.profile.trials())
    }

    pub fn harness(&self) -> Harness<ChaCha8Rng> {
        Harness::new(self.rng()).with_accumulation(self.accumulation)
    }
}

/// Source of timestamps for the timed window.
pub trait Clock {
    type Stamp: Copy;

    fn now(&self) -> Self::Stamp;

    /// Nanoseconds from `start` to `end`; never negative.
    fn nanos_between(&self, start: Self::Stamp, end: Self::Stamp) -> u64;
}

/// `Instant`-backed clock; monotonic, so consecutive reads never go backwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Stamp = Instant;

    #[inline(always)]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn nanos_between(&self, start: Instant, end: Instant) -> u64 {
        let nanos = end.saturating_duration_since(start).as_nanos();
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Measured {
    pub trials: u64,
    pub total_ns: u128,
    pub mean_ns: f64,
}

struct MeanAccumulator {
    trials: u64,
    mode: Accumulation,
    running: f64,
    total_ns: u128,
}

impl MeanAccumulator {
    fn new(trials: u64, mode: Accumulation) -> Self {
        Self {
            trials,
            mode,
            running: 0.0,
            total_ns: 0,
        }
    }

    #[inline]
    fn push(&mut self, elapsed_ns: u64) {
        self.total_ns += u128::from(elapsed_ns);
        if self.mode == Accumulation::Streaming {
            self.running += elapsed_ns as f64 / self.trials as f64;
        }
    }

    fn finish(self) -> Measured {
        let mean_ns = match self.mode {
            Accumulation::Streaming => self.running,
            Accumulation::SumThenDivide => self.total_ns as f64 / self.trials as f64,
        };
        Measured {
            trials: self.trials,
            total_ns: self.total_ns,
            mean_ns,
        }
    }
}

/// Uniform sample from the closed interval [0, 1].
pub fn unit_sample<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..=1.0)
}

pub struct Harness<R, C = MonotonicClock> {
    rng: R,
    clock: C,
    accumulation: Accumulation,
}

impl<R: Rng> Harness<R, MonotonicClock> {
    pub fn new(rng: R) -> Self {
        Self::with_clock(rng, MonotonicClock)
    }
}

impl<R: Rng, C: Clock> Harness<R, C> {
    pub fn with_clock(rng: R, clock: C) -> Self {
        Self {
            rng,
            clock,
            accumulation: Accumulation::default(),
        }
    }

    pub fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    pub fn accumulation(&self) -> Accumulation {
        self.accumulation
    }

    /// Times `f` over `trials` calls, each with a fresh input from [0, 1].
    ///
    /// Domain errors (NaN, infinity) in the result are timed like any other
    /// return value.
    pub fn measure_unary<F>(&mut self, mut f: F, trials: u64) -> Result<Measured, HarnessError>
    where
        F: FnMut(f32) -> f32,
    {
        self.run_trials(
            trials,
            |rng| unit_sample(rng),
            |x| {
                black_box(f(x));
            },
        )
    }

    /// Like [`Harness::measure_unary`], with two independent inputs per trial.
    pub fn measure_binary<F>(&mut self, mut f: F, trials: u64) -> Result<Measured, HarnessError>
    where
        F: FnMut(f32, f32) -> f32,
    {
        self.run_trials(
            trials,
            |rng| (unit_sample(rng), unit_sample(rng)),
            |(a, b)| {
                black_box(f(a, b));
            },
        )
    }

    fn run_trials<I, G, F>(
        &mut self,
        trials: u64,
        mut draw: G,
        mut call: F,
    ) -> Result<Measured, HarnessError>
    where
        G: FnMut(&mut R) -> I,
        F: FnMut(I),
    {
        if trials == 0 {
            return Err(HarnessError::ZeroTrials);
        }

        let mut acc = MeanAccumulator::new(trials, self.accumulation);
        for _ in 0..trials {
            let input = black_box(draw(&mut self.rng));

            let start = self.clock.now();
            call(input);
            let end = self.clock.now();

            acc.push(self.clock.nanos_between(start, end));
        }

        Ok(acc.finish())
    }
}

/// Mean per-call duration of `f` in nanoseconds, using the thread-local RNG.
pub fn measure_unary<F>(f: F, trials: u64) -> Result<f64, HarnessError>
where
    F: FnMut(f32) -> f32,
{
    Harness::new(rand::thread_rng())
        .measure_unary(f, trials)
        .map(|m| m.mean_ns)
}

/// Mean per-call duration of `f` in nanoseconds, using the thread-local RNG.
pub fn measure_binary<F>(f: F, trials: u64) -> Result<f64, HarnessError>
where
    F: FnMut(f32, f32) -> f32,
{
    Harness::new(rand::thread_rng())
        .measure_binary(f, trials)
        .map(|m| m.mean_ns)
}
