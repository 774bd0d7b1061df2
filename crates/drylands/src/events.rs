//! # Drylands Event System
//!
//! Lock-free outbound events for the presentation collaborators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │   Engine    │─────>│   Event     │─────>│  Renderer   │
//! │   (tick)    │      │   Channel   │      │   / HUD     │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! Events flow FROM the engine TO whoever draws the world.
//! The channel is bounded; a full channel drops the event rather than
//! stalling the tick, and the drop is counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use drylands_core::EntityId;
use drylands_shared::{ChunkCoord, Vec3};
use tracing::warn;

use crate::gameplay::GameState;
use crate::world::EntityKind;

/// One entity created by a chunk load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnedEntity {
    /// Entity id.
    pub id: EntityId,
    /// Variant.
    pub kind: EntityKind,
    /// World position.
    pub position: Vec3,
}

/// Why an entity stopped existing outside of a chunk unload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DespawnCause {
    /// Picked up by the player.
    Collected,
    /// Killed by a projectile, or a projectile spent on a kill.
    Killed,
    /// Projectile exceeded its maximum age.
    Expired,
    /// Projectile left the world border.
    OutOfBounds,
}

/// Events emitted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    // =========================================================================
    // Chunk Events
    // =========================================================================
    /// A chunk was materialized with these entities.
    ChunkMaterialized {
        /// Chunk coordinate.
        coord: ChunkCoord,
        /// Every entity it spawned, in spawn order.
        spawns: Vec<SpawnedEntity>,
    },

    /// A chunk was unloaded. Every listed entity is gone.
    ChunkRemoved {
        /// Chunk coordinate.
        coord: ChunkCoord,
        /// Entities that were still live at unload.
        entities: Vec<EntityId>,
    },

    // =========================================================================
    // Entity Events
    // =========================================================================
    /// A chunk-independent entity spawned.
    EntitySpawned {
        /// Entity id.
        id: EntityId,
        /// Variant.
        kind: EntityKind,
        /// Initial position.
        position: Vec3,
    },

    /// An entity was removed outside of a chunk unload.
    EntityDespawned {
        /// Entity id.
        id: EntityId,
        /// Reason.
        cause: DespawnCause,
    },

    // =========================================================================
    // Game Events
    // =========================================================================
    /// The game reached a terminal state.
    GameOver {
        /// Victory or Defeat.
        state: GameState,
        /// Player health, rounded.
        final_health: i32,
        /// Resources collected this game.
        resources_collected: u32,
        /// Treasures found this game.
        treasures_found: u32,
    },
}

/// Event bus for engine output.
///
/// Pre-allocates a bounded channel to prevent memory growth in the hot path.
pub struct EventBus {
    /// Sender end - held by the engine.
    sender: Sender<GameEvent>,
    /// Receiver end - held by consumers.
    receiver: Receiver<GameEvent>,
    /// Events dropped because the channel was full.
    dropped: Arc<AtomicU64>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before dropping.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
///
/// Every send is non-blocking. When the channel is full the event is lost,
/// counted in [`EventSender::dropped_count`] and logged; chunk events are no
/// exception. A consumer that sees the count rise can no longer trust its
/// mirror of the world and should rebuild it from
/// [`ChunkRegistry`](crate::world::ChunkRegistry) and
/// [`EntityRegistries`](crate::world::EntityRegistries), which are always
/// authoritative.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the event was dropped. Never waits for a consumer:
    /// the engine and its consumer usually share a thread.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(?event, total, "event channel full, dropping event");
                false
            }
            // Nobody is listening. Headless runs do this on purpose.
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Number of events dropped because the channel was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events pending.
    #[inline]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn despawn(raw: u64) -> GameEvent {
        GameEvent::EntityDespawned {
            id: EntityId::from_raw(raw),
            cause: DespawnCause::Collected,
        }
    }

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(100);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(GameEvent::ChunkRemoved {
            coord: ChunkCoord::new(4, -4),
            entities: vec![EntityId::from_raw(3)],
        }));
        assert!(receiver.has_events());

        match receiver.try_recv().unwrap() {
            GameEvent::ChunkRemoved { coord, entities } => {
                assert_eq!(coord, ChunkCoord::new(4, -4));
                assert_eq!(entities.len(), 1);
            }
            other => panic!("Wrong event type: {other:?}"),
        }
    }

    #[test]
    fn test_event_drain() {
        let (sender, receiver) = EventBus::create_pair(100);
        for i in 0..10 {
            assert!(sender.send(despawn(i)));
        }

        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert_eq!(events[3], despawn(3));
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops_and_counts() {
        let (sender, receiver) = EventBus::create_pair(2);
        assert!(sender.send(despawn(1)));
        assert!(sender.send(despawn(2)));
        assert!(!sender.send(despawn(3)));
        assert_eq!(sender.dropped_count(), 1);
        assert_eq!(receiver.pending_count(), 2);
    }

    #[test]
    fn test_disconnected_is_not_counted() {
        let (sender, receiver) = EventBus::create_pair(2);
        drop(receiver);
        assert!(!sender.send(despawn(1)));
        assert_eq!(sender.dropped_count(), 0);
    }
}
