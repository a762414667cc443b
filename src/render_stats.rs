//! Render statistics tracking for debugging and performance analysis.
//!
//! Enable render stats by compiling with the `render-stats` feature:
//! ```bash
//! cargo run --example headless_frame --features render-stats
//! ```
//!
//! A summary is logged at info level at most once per second, showing:
//! - Frames executed
//! - Draw calls and material runs (and how well commands batch)
//! - Commands rejected by a full staging buffer or command pool

#[cfg(not(feature = "render-stats"))]
use crate::renderer::ExecuteStats;

/// Snapshot of accumulated render statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub frames_executed: u64,
    pub draw_calls: u64,
    pub material_runs: u64,
    pub commands_rejected: u64,
}

#[cfg(feature = "render-stats")]
mod inner {
    use crate::renderer::ExecuteStats;
    use std::cell::RefCell;
    use std::time::Instant;

    thread_local! {
        static STATS: RefCell<RenderStats> = RefCell::new(RenderStats::new());
    }

    struct RenderStats {
        frames_executed: u64,
        draw_calls: u64,
        material_runs: u64,
        commands_rejected: u64,
        last_print: Instant,
    }

    impl RenderStats {
        fn new() -> Self {
            Self {
                frames_executed: 0,
                draw_calls: 0,
                material_runs: 0,
                commands_rejected: 0,
                last_print: Instant::now(),
            }
        }

        fn reset(&mut self) {
            *self = Self::new();
        }
    }

    /// Record one canvas execute.
    #[inline]
    pub fn record_frame_executed(frame: &ExecuteStats) {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.frames_executed += 1;
            stats.draw_calls += frame.draw_calls as u64;
            stats.material_runs += frame.material_runs as u64;

            if stats.last_print.elapsed().as_secs() >= 1 {
                let batching = if stats.material_runs > 0 {
                    stats.draw_calls as f64 / stats.material_runs as f64
                } else {
                    0.0
                };
                log::info!(
                    "[Render Stats] frames={} draws={} runs={} draws_per_run={:.1} rejected={}",
                    stats.frames_executed,
                    stats.draw_calls,
                    stats.material_runs,
                    batching,
                    stats.commands_rejected
                );
                stats.reset();
            }
        });
    }

    /// Record a submission refused for lack of capacity.
    #[inline]
    pub fn record_command_rejected() {
        STATS.with(|s| {
            s.borrow_mut().commands_rejected += 1;
        });
    }

    /// Return a snapshot of the current stats (for testing).
    pub fn get_stats() -> super::StatsSnapshot {
        STATS.with(|s| {
            let stats = s.borrow();
            super::StatsSnapshot {
                frames_executed: stats.frames_executed,
                draw_calls: stats.draw_calls,
                material_runs: stats.material_runs,
                commands_rejected: stats.commands_rejected,
            }
        })
    }

    /// Reset all stats to zero (for test isolation).
    pub fn reset_stats() {
        STATS.with(|s| {
            s.borrow_mut().reset();
        });
    }
}

#[cfg(feature = "render-stats")]
pub use inner::*;

// No-op implementations when feature is disabled

#[cfg(not(feature = "render-stats"))]
#[inline(always)]
pub fn get_stats() -> StatsSnapshot {
    StatsSnapshot::default()
}

#[cfg(not(feature = "render-stats"))]
#[inline(always)]
pub fn reset_stats() {}

#[cfg(not(feature = "render-stats"))]
#[inline(always)]
pub fn record_frame_executed(_frame: &ExecuteStats) {}

#[cfg(not(feature = "render-stats"))]
#[inline(always)]
pub fn record_command_rejected() {}
