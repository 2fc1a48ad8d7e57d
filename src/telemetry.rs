//! Per-phase step timing.
//!
//! The engine owns one `StepProfiler` and reports every pass of every step to
//! it. `NoopProfiler` is the default; `LogProfiler` keeps per-step and run
//! totals and logs them.

use std::fmt;
use std::time::{Duration, Instant};

use bevy::log::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepPhase {
    P2gTransfer,
    ComputeGridForce,
    GridVelocityUpdate,
    G2pTransfer,
    UpdateDeformGrad,
    PlasticityHardening,
    SnapshotOutput,
}

pub const PHASE_COUNT: usize = 7;

impl StepPhase {
    pub const ALL: [StepPhase; PHASE_COUNT] = [
        Self::P2gTransfer,
        Self::ComputeGridForce,
        Self::GridVelocityUpdate,
        Self::G2pTransfer,
        Self::UpdateDeformGrad,
        Self::PlasticityHardening,
        Self::SnapshotOutput,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::P2gTransfer => "p2g_transfer",
            Self::ComputeGridForce => "grid_force",
            Self::GridVelocityUpdate => "grid_velocity_update",
            Self::G2pTransfer => "g2p_transfer",
            Self::UpdateDeformGrad => "update_deform_grad",
            Self::PlasticityHardening => "plasticity_hardening",
            Self::SnapshotOutput => "snapshot_output",
        }
    }

    #[inline]
    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait StepProfiler: Send + Sync {
    /// Add `elapsed` to `phase` for the current step.
    fn record(&mut self, phase: StepPhase, elapsed: Duration);

    /// Called once after the step has finished.
    fn end_step(&mut self, step: u64);

    /// Called instead of `end_step` when the step failed part-way.
    fn abort_step(&mut self, _step: u64) {}

    /// Summarize the run so far.
    fn report(&self) {}
}

/// Run `f`, reporting its wall time as `phase`.
#[inline]
pub fn timed<T>(profiler: &mut dyn StepProfiler, phase: StepPhase, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    profiler.record(phase, start.elapsed());
    result
}

#[derive(Default, Debug, Clone, Copy)]
pub struct NoopProfiler;

impl StepProfiler for NoopProfiler {
    #[inline(always)]
    fn record(&mut self, _phase: StepPhase, _elapsed: Duration) {}

    #[inline(always)]
    fn end_step(&mut self, _step: u64) {}
}

type PhaseTimes = [Duration; PHASE_COUNT];

#[derive(Default, Debug, Clone)]
pub struct LogProfiler {
    step_times: PhaseTimes,
    total_times: PhaseTimes,
    steps: u64,
}

impl LogProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn total(&self, phase: StepPhase) -> Duration {
        self.total_times[phase.slot()]
    }

    pub fn total_elapsed(&self) -> Duration {
        self.total_times.iter().sum()
    }
}

fn percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.as_secs_f64() / total.as_secs_f64() * 100.0
    }
}

impl StepProfiler for LogProfiler {
    fn record(&mut self, phase: StepPhase, elapsed: Duration) {
        self.step_times[phase.slot()] += elapsed;
    }

    fn end_step(&mut self, step: u64) {
        let step_total: Duration = self.step_times.iter().sum();
        debug!(
            "step {}: {:.3}ms",
            step,
            step_total.as_secs_f64() * 1000.0
        );
        for phase in StepPhase::ALL {
            let elapsed = self.step_times[phase.slot()];
            debug!(
                "  {}: {:.3}ms ({:.1}%)",
                phase,
                elapsed.as_secs_f64() * 1000.0,
                percent(elapsed, step_total)
            );
            self.total_times[phase.slot()] += elapsed;
        }
        self.step_times = PhaseTimes::default();
        self.steps += 1;
    }

    /// Keep the partial step's samples in the totals without counting it.
    fn abort_step(&mut self, step: u64) {
        let step_total: Duration = self.step_times.iter().sum();
        debug!(
            "step {} aborted after {:.3}ms",
            step,
            step_total.as_secs_f64() * 1000.0
        );
        for (total, elapsed) in self.total_times.iter_mut().zip(self.step_times) {
            *total += elapsed;
        }
        self.step_times = PhaseTimes::default();
    }

    /// Log the run-total distribution over phases.
    fn report(&self) {
        let total = self.total_elapsed();
        info!(
            "profile over {} steps: {:.3}ms total",
            self.steps,
            total.as_secs_f64() * 1000.0
        );
        for phase in StepPhase::ALL {
            let elapsed = self.total_times[phase.slot()];
            info!(
                "  {}: {:.3}ms ({:.1}%)",
                phase,
                elapsed.as_secs_f64() * 1000.0,
                percent(elapsed, total)
            );
        }
    }
}
