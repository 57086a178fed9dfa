//! Fixed-period tick driver
//!
//! The host calls [`Session::advance`] with real elapsed time from whatever
//! loop it owns (requestAnimationFrame, a terminal poll, a test). Time is
//! accumulated and spent in whole ticks of the engine's period.

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{Engine, Intent, SessionStatus};

/// Accumulator that turns elapsed seconds into whole ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    period: f32,
    accumulator: f32,
    max_substeps: u32,
    armed: bool,
}

impl FixedStep {
    pub fn new(period: f32) -> Self {
        Self::with_max_substeps(period, MAX_SUBSTEPS)
    }

    pub fn with_max_substeps(period: f32, max_substeps: u32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
            armed: true,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start (or restart) from a clean accumulator
    pub fn arm(&mut self) {
        self.accumulator = 0.0;
        self.armed = true;
    }

    /// Stop ticking. Nothing left in the accumulator survives.
    pub fn cancel(&mut self) {
        self.accumulator = 0.0;
        self.armed = false;
    }

    /// Spend `elapsed` seconds on `engine`, returning the number of ticks run
    ///
    /// Ticks only while the engine is Running. Time passing before the game
    /// starts is dropped, and reaching Over/Won disarms the timer.
    pub fn advance<E: Engine>(&mut self, engine: &mut E, elapsed: f32) -> u32 {
        if !self.armed {
            return 0;
        }

        match engine.status() {
            SessionStatus::NotStarted => {
                self.accumulator = 0.0;
                return 0;
            }
            SessionStatus::Over | SessionStatus::Won => {
                self.cancel();
                return 0;
            }
            SessionStatus::Running => {}
        }

        // Clamp long stalls (tab hidden, debugger) to what we'd run anyway.
        // A NaN frame would poison the accumulator for good.
        let budget = self.period * self.max_substeps as f32;
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, budget)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= self.period && substeps < self.max_substeps {
            engine.tick();
            self.accumulator -= self.period;
            substeps += 1;

            if engine.status().is_terminal() {
                log::debug!("Timer cancelled after {} tick(s): {:?}", engine.ticks(), engine.status());
                self.cancel();
                break;
            }
        }

        // Never carry more than one period of backlog past the substep cap
        if self.accumulator > self.period {
            self.accumulator = self.period;
        }

        substeps
    }
}

/// An engine together with the timer that drives it
#[derive(Debug, Clone)]
pub struct Session<E: Engine> {
    engine: E,
    clock: FixedStep,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E, period: f32) -> Self {
        Self {
            engine,
            clock: FixedStep::new(period),
        }
    }

    pub fn with_clock(engine: E, clock: FixedStep) -> Self {
        Self { engine, clock }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn clock(&self) -> &FixedStep {
        &self.clock
    }

    pub fn status(&self) -> SessionStatus {
        self.engine.status()
    }

    pub fn score(&self) -> u64 {
        self.engine.score()
    }

    pub fn snapshot(&self) -> E::Snapshot {
        self.engine.snapshot()
    }

    /// Forward a key-down. An intent that starts the game also arms the timer.
    pub fn apply_intent(&mut self, intent: Intent) {
        let before = self.engine.status();
        self.engine.apply_intent(intent);
        if before != SessionStatus::Running && self.engine.status() == SessionStatus::Running {
            self.clock.arm();
        }
    }

    pub fn release_intent(&mut self, intent: Intent) {
        self.engine.release_intent(intent);
    }

    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.clock.advance(&mut self.engine, elapsed)
    }

    /// Cancel the timer, replace the engine state, then re-arm
    pub fn reset(&mut self) {
        self.clock.cancel();
        self.engine.reset();
        self.clock.arm();
    }
}
