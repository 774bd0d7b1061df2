//! # Streaming Controller
//!
//! Keeps the chunk window around the player materialized.
//!
//! ```text
//!   unload ring (> load + hysteresis)      evicted
//!   ┌───────────────────────────────┐
//!   │ hysteresis band               │      kept if loaded, never loaded
//!   │   ┌───────────────────────┐   │
//!   │   │ load window (<= load) │   │      always loaded
//!   │   │          P            │   │
//!   │   └───────────────────────┘   │
//!   └───────────────────────────────┘
//! ```
//!
//! Distances are Chebyshev, in chunks. The band stops a player pacing along
//! a chunk border from loading and evicting the same ring every frame.

use drylands_shared::{ChunkCoord, Vec3};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ChunkResult;
use crate::events::EventSender;
use crate::world::chunks::ChunkRegistry;
use crate::world::entities::EntityRegistries;

/// What one update did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunk the player is in.
    pub player_chunk: ChunkCoord,
    /// Chunks materialized by this update, in load order.
    pub loaded: Vec<ChunkCoord>,
    /// Chunks evicted by this update, sorted.
    pub unloaded: Vec<ChunkCoord>,
    /// True if the window scan was skipped because nothing changed.
    pub skipped: bool,
}

/// Drives the chunk registry from the player position.
#[derive(Clone, Debug)]
pub struct StreamingController {
    load_distance: i32,
    unload_distance: i32,
    parallel_threshold: usize,
    /// Player chunk and registry revision after the last full scan.
    last_scan: Option<(ChunkCoord, u64)>,
}

impl StreamingController {
    /// Creates a controller from the engine config.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            load_distance: config.render_distance,
            unload_distance: config.unload_distance(),
            parallel_threshold: config.parallel_threshold,
            last_scan: None,
        }
    }

    /// Chebyshev radius kept loaded.
    #[must_use]
    pub const fn load_distance(&self) -> i32 {
        self.load_distance
    }

    /// Chebyshev radius beyond which chunks are evicted.
    #[must_use]
    pub const fn unload_distance(&self) -> i32 {
        self.unload_distance
    }

    /// Forces the next update to scan.
    pub fn invalidate(&mut self) {
        self.last_scan = None;
    }

    /// Loads the window around `player_position` and evicts far chunks.
    ///
    /// Skips all work when the player is in the same chunk as at the last
    /// scan and nothing has loaded or unloaded since.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ChunkError`](crate::error::ChunkError). The
    /// next update scans again.
    pub fn update(
        &mut self,
        player_position: Vec3,
        chunks: &mut ChunkRegistry,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> ChunkResult<StreamingReport> {
        let player_chunk = ChunkCoord::containing(player_position);

        if self.last_scan == Some((player_chunk, chunks.revision())) {
            return Ok(StreamingReport {
                player_chunk,
                skipped: true,
                ..StreamingReport::default()
            });
        }
        self.last_scan = None;

        let loaded = chunks.ensure_loaded_many(
            player_chunk.neighbourhood(self.load_distance),
            self.parallel_threshold,
            entities,
            events,
        )?;

        let far: Vec<ChunkCoord> = chunks
            .coords()
            .filter(|coord| coord.chebyshev_distance(player_chunk) > self.unload_distance)
            .collect();
        for &coord in &far {
            chunks.unload(coord, entities, events);
        }

        self.last_scan = Some((player_chunk, chunks.revision()));

        if !loaded.is_empty() || !far.is_empty() {
            debug!(
                %player_chunk,
                loaded = loaded.len(),
                unloaded = far.len(),
                resident = chunks.len(),
                "streaming window updated"
            );
        }

        Ok(StreamingReport {
            player_chunk,
            loaded,
            unloaded: far,
            skipped: false,
        })
    }
}
