//! # Interaction Pass
//!
//! Movement, vitals, pickups and melee contact, in the order the engine
//! runs them each tick:
//!
//! ```text
//! movement ─> vitals ─> resources ─> structure items ─> treasure ─> melee
//! ```
//!
//! Every pickup collects matching ids first and removes them afterwards, so
//! a removed entity can never be collected twice.

use drylands_core::EntityId;
use drylands_shared::constants::{
    HUNGER_DECAY_IDLE, HUNGER_DECAY_MOVING, RESOURCE_HUNGER_RESTORE, STARVATION_DAMAGE,
};
use drylands_shared::Vec3;
use tracing::trace;

use crate::config::EngineConfig;
use crate::events::{DespawnCause, EventSender, GameEvent};
use crate::gameplay::player::PlayerState;
use crate::world::{EntityRegistries, ItemContents};

/// Distances and rates for the interaction pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionPass {
    player_speed: f32,
    world_border: f32,
    pickup_radius: f32,
    melee_radius: f32,
    melee_damage: f32,
}

impl InteractionPass {
    /// Creates the pass from the engine config.
    #[must_use]
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            player_speed: config.player_speed,
            world_border: config.world_border,
            pickup_radius: config.pickup_radius,
            melee_radius: config.melee_radius,
            melee_damage: config.melee_damage,
        }
    }

    // =========================================================================
    // Movement & Vitals
    // =========================================================================

    /// Moves the player along the horizontal part of `intent`.
    ///
    /// A step that would leave the world disc is rejected whole. Returns
    /// true if the position changed.
    pub fn apply_movement(&self, player: &mut PlayerState, intent: Vec3) -> bool {
        let direction = Vec3::ground(intent.x, intent.z).normalized();
        if direction.is_zero() {
            return false;
        }

        let next = player.position + direction * self.player_speed;
        if next.horizontal_length() > self.world_border {
            trace!(x = next.x, z = next.z, "step rejected at world border");
            return false;
        }

        player.position = next;
        true
    }

    /// Applies per-tick hunger decay and starvation damage.
    pub fn apply_vitals(player: &mut PlayerState, moved: bool) {
        let decay = if moved {
            HUNGER_DECAY_IDLE + HUNGER_DECAY_MOVING
        } else {
            HUNGER_DECAY_IDLE
        };
        player.drain_hunger(decay);

        if player.is_starving() {
            player.damage(STARVATION_DAMAGE);
        }
    }

    // =========================================================================
    // Pickups
    // =========================================================================

    /// Collects every resource in reach. Returns how many were collected.
    pub fn collect_resources(
        &self,
        player: &mut PlayerState,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> u32 {
        let at = player.position;
        let radius = self.pickup_radius;
        let collected = entities
            .resources
            .drain_where(|record| record.position.distance(at) < radius);

        for record in &collected {
            player.resources_collected = player.resources_collected.saturating_add(1);
            player.feed(RESOURCE_HUNGER_RESTORE);
            trace!(id = %record.id, "resource collected");
            events.send(GameEvent::EntityDespawned {
                id: record.id,
                cause: DespawnCause::Collected,
            });
        }

        count(collected.len())
    }

    /// Collects every ammo and weapon crate in reach, in spawn order.
    ///
    /// Ammo adds to the count. A weapon equips and reloads a full magazine,
    /// so a later crate in the same tick sees the new count.
    pub fn collect_items(
        &self,
        player: &mut PlayerState,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> u32 {
        let at = player.position;
        let radius = self.pickup_radius;
        let collected = entities
            .items
            .drain_where(|record| record.position.distance(at) < radius);

        for record in &collected {
            match record.payload.contents {
                ItemContents::Ammo(rounds) => player.add_ammo(rounds),
                ItemContents::Weapon(kind) => player.equip(kind),
            }
            trace!(id = %record.id, contents = ?record.payload.contents, "structure item collected");
            events.send(GameEvent::EntityDespawned {
                id: record.id,
                cause: DespawnCause::Collected,
            });
        }

        count(collected.len())
    }

    /// Collects every treasure in reach. Any treasure collected means
    /// victory; the caller owns the state transition.
    pub fn collect_treasure(
        &self,
        player: &mut PlayerState,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> u32 {
        let at = player.position;
        let radius = self.pickup_radius;
        let collected = entities
            .treasures
            .drain_where(|record| record.position.distance(at) < radius);

        for record in &collected {
            player.treasures_found = player.treasures_found.saturating_add(1);
            trace!(id = %record.id, "treasure collected");
            events.send(GameEvent::EntityDespawned {
                id: record.id,
                cause: DespawnCause::Collected,
            });
        }

        count(collected.len())
    }

    // =========================================================================
    // Melee
    // =========================================================================

    /// Damages the player once per hostile in melee range. Returns the
    /// hostiles that landed a hit.
    pub fn apply_melee(&self, player: &mut PlayerState, entities: &EntityRegistries) -> Vec<EntityId> {
        let at = player.position;
        let attackers: Vec<EntityId> = entities
            .hostiles
            .iter()
            .filter(|record| record.position.distance(at) < self.melee_radius)
            .map(|record| record.id)
            .collect();

        for _ in &attackers {
            player.damage(self.melee_damage);
        }
        attackers
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
