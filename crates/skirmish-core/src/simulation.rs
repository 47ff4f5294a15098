//! Simulation module with the fixed-rate tick loop.
//!
//! The `Simulation` struct owns the [`Arena`] and drives it one sweep per
//! tick:
//!
//! 1. **CHECK**: skip the sweep while paused
//! 2. **SWEEP**: move, report and update every entity, then report the summary
//! 3. **PACE**: sleep until the next tick boundary
//! 4. **STOP**: leave the loop once a stop has been requested
//!
//! # Threading
//!
//! The loop runs on one dedicated thread that owns the arena outright, so
//! entity state needs no locking. Other threads talk to it only through the
//! shared [`SimControl`] flags.
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimConfig;
//! use skirmish_core::render::FrameBuffer;
//! use skirmish_core::simulation::Simulation;
//!
//! let config = SimConfig { seed: Some(42), ..SimConfig::default() };
//! let mut sim = Simulation::new(&config).unwrap();
//! let mut frames = FrameBuffer::new();
//!
//! sim.run_for(10, &mut frames);
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(frames.frames(), 10);
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::info;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::render::RenderSink;

// =============================================================================
// Control
// =============================================================================

/// Pause and stop flags shared between the tick thread and its owners.
#[derive(Debug, Default)]
pub struct SimControl {
    paused: AtomicBool,
    stopped: AtomicBool,
}

impl SimControl {
    /// Creates a running control.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspends sweeps; pacing continues.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resumes sweeps.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Ends the loop after the current tick. Permanent.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// True while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// True once stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Pacing
// =============================================================================

/// Fixed-interval pacing.
///
/// An overrun cycle gets no sleep, and the schedule restarts from the overrun
/// instead of replaying the missed ticks.
#[derive(Debug, Clone)]
pub struct TickPacer {
    interval: Duration,
    deadline: Instant,
}

impl TickPacer {
    /// Starts a schedule whose first deadline is one interval after `start`.
    #[must_use]
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            deadline: start + interval,
        }
    }

    /// Time to sleep before the next cycle, given the current time.
    pub fn next_wait(&mut self, now: Instant) -> Duration {
        let wait = self.deadline.saturating_duration_since(now);
        self.deadline = self.deadline.max(now) + self.interval;
        wait
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Owner of the arena and its tick loop.
#[derive(Debug)]
pub struct Simulation {
    arena: Arena,
    control: Arc<SimControl>,
    tick_interval: Duration,
    time_step: f64,
}

impl Simulation {
    /// Builds an arena from `config` and seeds every configured side.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is invalid.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut arena = Arena::from_config(config);
        for loadout in &config.sides {
            arena.seed_side(loadout);
        }
        info!(entities = arena.len(), "battle seeded");
        Ok(Self::with_arena(arena, config.tick_interval(), config.time_step))
    }

    /// Wraps an existing arena.
    #[must_use]
    pub fn with_arena(arena: Arena, tick_interval: Duration, time_step: f64) -> Self {
        Self {
            arena,
            control: Arc::new(SimControl::new()),
            tick_interval,
            time_step,
        }
    }

    /// The arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The arena, mutably.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Shared pause/stop handle.
    #[must_use]
    pub fn control(&self) -> Arc<SimControl> {
        Arc::clone(&self.control)
    }

    /// Completed sweeps.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Runs one cycle without pacing. Returns false if paused.
    pub fn step(&mut self, sink: &mut dyn RenderSink) -> bool {
        if self.control.is_paused() {
            return false;
        }
        self.arena.sweep(self.time_step, sink);
        true
    }

    /// Runs up to `ticks` unpaced cycles, stopping early if stopped.
    ///
    /// Returns the number of sweeps performed.
    pub fn run_for(&mut self, ticks: u64, sink: &mut dyn RenderSink) -> u64 {
        let mut swept = 0;
        for _ in 0..ticks {
            if self.control.is_stopped() {
                break;
            }
            if self.step(sink) {
                swept += 1;
            }
        }
        swept
    }

    /// Runs paced cycles until stopped.
    pub fn run(&mut self, sink: &mut dyn RenderSink) {
        info!(interval_ms = self.tick_interval.as_millis(), "tick loop started");
        let mut pacer = TickPacer::new(self.tick_interval, Instant::now());
        while !self.control.is_stopped() {
            self.step(sink);
            let wait = pacer.next_wait(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        info!(tick = self.tick(), "tick loop stopped");
    }

    /// Moves the loop onto a dedicated thread.
    ///
    /// Stop it through [`Simulation::control`]; joining returns the
    /// simulation and the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<S>(mut self, mut sink: S) -> io::Result<JoinHandle<(Self, S)>>
    where
        S: RenderSink + Send + 'static,
    {
        thread::Builder::new()
            .name("skirmish-tick".into())
            .spawn(move || {
                self.run(&mut sink);
                (self, sink)
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
