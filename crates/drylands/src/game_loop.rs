//! # Drylands Game Loop
//!
//! Headless frame orchestration:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. SCRIPT                                                           │
//! │    └─ Ask the driver for this frame's movement, look and fire aim   │
//! │                                                                     │
//! │ 2. FIRE                                                             │
//! │    └─ Weapon fire at the simulated clock (frame × frame_ms)         │
//! │                                                                     │
//! │ 3. TICK                                                             │
//! │    └─ Movement, streaming, pickups, melee, projectiles, wanderers   │
//! │                                                                     │
//! │ 4. DRAIN                                                            │
//! │    └─ Empty the event channel so it never fills                     │
//! │                                                                     │
//! │ 5. END FRAME                                                        │
//! │    └─ Record timing                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock handed to the engine is simulated, so a scripted run fires the
//! same shots no matter how fast the host is.

use std::time::{Duration, Instant};

use drylands_shared::Vec3;
use tracing::warn;

use crate::engine::{Engine, FrameInput, TickReport};
use crate::error::EngineResult;
use crate::events::{EventReceiver, GameEvent};

/// Simulated time per frame, 60 FPS.
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Wall-clock time per frame before a frame counts as over budget.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Configuration for the game loop.
#[derive(Clone, Debug)]
pub struct GameLoopConfig {
    /// Simulated milliseconds per frame.
    pub frame_ms: u64,
    /// Stop after this many frames even if the game is still running.
    pub max_frames: u64,
    /// Warn about frames over budget.
    pub enable_timing_logs: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            max_frames: 3_600,
            enable_timing_logs: false,
        }
    }
}

/// What the driver wants done in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameCommand {
    /// Tick input.
    pub input: FrameInput,
    /// Fire along this aim before the tick.
    pub fire: Option<Vec3>,
}

/// Statistics for a single frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Engine tick time in microseconds.
    pub tick_us: u64,
    /// Events drained this frame.
    pub events_processed: u32,
    /// Chunks materialized this frame.
    pub chunks_loaded: u32,
    /// Chunks evicted this frame.
    pub chunks_unloaded: u32,
    /// Hostiles killed this frame.
    pub kills: u32,
    /// True if a shot was fired this frame.
    pub fired: bool,
}

/// Drives an [`Engine`] frame by frame.
pub struct GameLoop {
    engine: Engine,
    events: EventReceiver,
    config: GameLoopConfig,
    frame_count: u64,
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a loop around `engine`.
    #[must_use]
    pub fn new(engine: Engine, config: GameLoopConfig) -> Self {
        let events = engine.events();
        Self {
            engine,
            events,
            config,
            frame_count: 0,
            stats_accumulator: FrameStatsAccumulator::new(),
        }
    }

    /// Simulated clock for the current frame.
    #[inline]
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.frame_count * self.config.frame_ms
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Propagates engine tick errors. The frame is not counted.
    pub fn run_frame(&mut self, command: FrameCommand) -> EngineResult<(TickReport, Vec<GameEvent>)> {
        let start = Instant::now();

        let now_ms = self.now_ms();
        let fired = command
            .fire
            .is_some_and(|aim| self.engine.fire_weapon(aim, now_ms).fired());

        let tick_start = Instant::now();
        let report = self.engine.tick(command.input)?;
        let tick_us = elapsed_us(tick_start);

        let events = self.events.drain();

        let stats = FrameStats {
            frame: self.frame_count,
            total_us: elapsed_us(start),
            tick_us,
            events_processed: saturating_u32(events.len()),
            chunks_loaded: saturating_u32(report.streaming.loaded.len()),
            chunks_unloaded: saturating_u32(report.streaming.unloaded.len()),
            kills: saturating_u32(report.projectiles.kills.len()),
            fired,
        };
        self.end_frame(stats);

        Ok((report, events))
    }

    /// Runs frames from `script` until the game ends or `max_frames` is hit.
    /// The script sees the frame number and the engine before each frame.
    ///
    /// Returns the number of frames run.
    ///
    /// # Errors
    ///
    /// Propagates engine tick errors.
    pub fn run<F>(&mut self, mut script: F) -> EngineResult<u64>
    where
        F: FnMut(u64, &Engine) -> FrameCommand,
    {
        let first = self.frame_count;
        while self.frame_count - first < self.config.max_frames && !self.engine.state().is_terminal() {
            let command = script(self.frame_count, &self.engine);
            self.run_frame(command)?;
        }
        Ok(self.frame_count - first)
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            warn!(
                frame = stats.frame,
                total_ms = stats.total_us as f64 / 1000.0,
                chunks_loaded = stats.chunks_loaded,
                "frame exceeded budget"
            );
        }
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The driven engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The driven engine, for scripted setups.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}

fn saturating_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of tick times.
    pub tick_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Events drained.
    pub events_total: u64,
    /// Chunks materialized.
    pub chunks_loaded: u64,
    /// Chunks evicted.
    pub chunks_unloaded: u64,
    /// Hostiles killed.
    pub kills: u64,
    /// Shots fired.
    pub shots: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            tick_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            events_total: 0,
            chunks_loaded: 0,
            chunks_unloaded: 0,
            kills: 0,
            shots: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.tick_us_sum += stats.tick_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.events_total += u64::from(stats.events_processed);
        self.chunks_loaded += u64::from(stats.chunks_loaded);
        self.chunks_unloaded += u64::from(stats.chunks_unloaded);
        self.kills += u64::from(stats.kills);
        self.shots += u64::from(stats.fired);

        if stats.total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns average tick time in milliseconds.
    #[must_use]
    pub fn avg_tick_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.tick_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the percentage of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        let min_frame_us = if self.frames_recorded == 0 { 0 } else { self.min_frame_us };
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ───────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms", self.avg_frame_ms());
        println!("│ Average Tick:       {:.3} ms", self.avg_tick_ms());
        println!("│ Min Frame:          {:.3} ms", min_frame_us as f64 / 1000.0);
        println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ WORLD ────────────────────────────────────────────────────────┐");
        println!("│ Chunks Loaded:      {}", self.chunks_loaded);
        println!("│ Chunks Unloaded:    {}", self.chunks_unloaded);
        println!("│ Events Drained:     {}", self.events_total);
        println!("│ Shots Fired:        {}", self.shots);
        println!("│ Hostiles Killed:    {}", self.kills);
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
