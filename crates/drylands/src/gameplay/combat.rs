//! # Combat
//!
//! Weapon fire and the per-tick projectile pass.
//!
//! ```text
//! fire_weapon ──> Projectile (age 0) ──tick──> advance, age += 1
//!                                          ├── age > max       -> Expired
//!                                          ├── |pos| > border  -> OutOfBounds
//!                                          └── first hostile within hit radius
//!                                                -> both Killed, ammo bonus
//! ```
//!
//! Removal is deferred to the end of the pass. A hostile claimed by one
//! projectile cannot be claimed by another in the same tick, and a
//! projectile claims at most one hostile.

use drylands_core::EntityId;
use drylands_shared::constants::{KILL_AMMO_BONUS, PROJECTILE_MAX_AGE, PROJECTILE_SPEED};
use drylands_shared::Vec3;
use tracing::trace;

use crate::config::EngineConfig;
use crate::events::{DespawnCause, EventSender, GameEvent};
use crate::gameplay::player::PlayerState;
use crate::world::{EntityKind, EntityRegistries, Projectile};

/// Result of a fire request. Only [`FireOutcome::Fired`] changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A projectile was spawned.
    Fired(EntityId),
    /// The game is over.
    NotRunning,
    /// No weapon equipped.
    NoWeapon,
    /// Ammo is zero.
    OutOfAmmo,
    /// The weapon's fire interval has not elapsed.
    Cooling,
}

impl FireOutcome {
    /// Returns true if a projectile was spawned.
    #[inline]
    #[must_use]
    pub const fn fired(self) -> bool {
        matches!(self, Self::Fired(_))
    }
}

/// What one projectile pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectileReport {
    /// `(projectile, hostile)` pairs removed by hits.
    pub kills: Vec<(EntityId, EntityId)>,
    /// Projectiles removed for age.
    pub expired: Vec<EntityId>,
    /// Projectiles removed for leaving the world disc.
    pub out_of_bounds: Vec<EntityId>,
}

/// Weapon fire and projectile simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatPass {
    hit_radius: f32,
    world_border: f32,
}

impl CombatPass {
    /// Creates the pass from the engine config.
    #[must_use]
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            hit_radius: config.hit_radius,
            world_border: config.world_border,
        }
    }

    /// Fires the equipped weapon along `aim`.
    ///
    /// Guards run in order: game running, weapon equipped, ammo left, fire
    /// interval elapsed since the last accepted shot. A rejected request
    /// leaves every piece of state untouched.
    pub fn fire(
        player: &mut PlayerState,
        entities: &mut EntityRegistries,
        events: &EventSender,
        running: bool,
        aim: Vec3,
        now_ms: u64,
    ) -> FireOutcome {
        if !running {
            return FireOutcome::NotRunning;
        }
        let Some(weapon) = player.weapon else {
            return FireOutcome::NoWeapon;
        };
        if player.ammo == 0 {
            return FireOutcome::OutOfAmmo;
        }
        let spec = weapon.spec();
        if let Some(last) = player.last_shot_ms {
            if now_ms.saturating_sub(last) < spec.fire_interval_ms {
                return FireOutcome::Cooling;
            }
        }

        player.ammo -= 1;
        player.last_shot_ms = Some(now_ms);

        let position = player.position;
        let id = entities.spawn_projectile(
            position,
            Projectile {
                velocity: aim.normalized() * PROJECTILE_SPEED,
                age: 0,
                damage: spec.damage,
            },
        );
        trace!(%id, weapon = spec.name, ammo = player.ammo, "weapon fired");
        events.send(GameEvent::EntitySpawned {
            id,
            kind: EntityKind::Projectile,
            position,
        });

        FireOutcome::Fired(id)
    }

    /// Advances every projectile one tick and resolves hits.
    pub fn update_projectiles(
        &self,
        player: &mut PlayerState,
        entities: &mut EntityRegistries,
        events: &EventSender,
    ) -> ProjectileReport {
        let mut report = ProjectileReport::default();

        // Pass 1: advance and classify. Nothing is removed yet.
        for projectile in entities.projectiles.iter_mut() {
            projectile.position += projectile.payload.velocity;
            projectile.payload.age += 1;

            if projectile.payload.age > PROJECTILE_MAX_AGE {
                report.expired.push(projectile.id);
                continue;
            }
            if projectile.position.length() > self.world_border {
                report.out_of_bounds.push(projectile.id);
                continue;
            }

            let at = projectile.position;
            let target = entities
                .hostiles
                .iter()
                .filter(|hostile| !report.kills.iter().any(|&(_, taken)| taken == hostile.id))
                .find(|hostile| hostile.position.distance(at) < self.hit_radius)
                .map(|hostile| hostile.id);

            if let Some(hostile) = target {
                report.kills.push((projectile.id, hostile));
            }
        }

        // Pass 2: apply.
        for &(projectile, hostile) in &report.kills {
            entities.projectiles.remove(projectile);
            entities.hostiles.remove(hostile);
            player.add_ammo(KILL_AMMO_BONUS);
            trace!(%projectile, %hostile, ammo = player.ammo, "hostile killed");
            events.send(GameEvent::EntityDespawned {
                id: hostile,
                cause: DespawnCause::Killed,
            });
            events.send(GameEvent::EntityDespawned {
                id: projectile,
                cause: DespawnCause::Killed,
            });
        }
        for (ids, cause) in [
            (&report.expired, DespawnCause::Expired),
            (&report.out_of_bounds, DespawnCause::OutOfBounds),
        ] {
            for &id in ids {
                entities.projectiles.remove(id);
                events.send(GameEvent::EntityDespawned { id, cause });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use drylands_shared::WeaponKind;

    fn armed(kind: WeaponKind) -> PlayerState {
        let mut player = PlayerState::new();
        player.equip(kind);
        player
    }

    #[test]
    fn test_fire_guards() {
        let (sender, _receiver) = EventBus::create_pair(16);
        let mut entities = EntityRegistries::new();

        let mut player = PlayerState::new();
        assert_eq!(
            CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::ground(0.0, 1.0), 0),
            FireOutcome::NoWeapon
        );

        let mut player = armed(WeaponKind::Ak47);
        assert_eq!(
            CombatPass::fire(&mut player, &mut entities, &sender, false, Vec3::ground(0.0, 1.0), 0),
            FireOutcome::NotRunning
        );

        player.ammo = 0;
        assert_eq!(
            CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::ground(0.0, 1.0), 0),
            FireOutcome::OutOfAmmo
        );
        assert!(entities.projectiles.is_empty());
    }

    #[test]
    fn test_fire_interval() {
        let (sender, _receiver) = EventBus::create_pair(16);
        let mut entities = EntityRegistries::new();
        let mut player = armed(WeaponKind::Ak47);

        assert!(CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::ground(0.0, 1.0), 1_000).fired());
        assert_eq!(
            CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::ground(0.0, 1.0), 1_079),
            FireOutcome::Cooling
        );
        assert!(CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::ground(0.0, 1.0), 1_080).fired());
        assert_eq!(player.ammo, 28);
        assert_eq!(entities.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_moves_and_expires() {
        let (sender, _receiver) = EventBus::create_pair(1024);
        let mut entities = EntityRegistries::new();
        let mut player = armed(WeaponKind::Mp40);
        let pass = CombatPass::new(&EngineConfig::default());

        let FireOutcome::Fired(id) =
            CombatPass::fire(&mut player, &mut entities, &sender, true, Vec3::new(0.0, 0.0, 3.0), 0)
        else {
            panic!("expected a shot");
        };

        pass.update_projectiles(&mut player, &mut entities, &sender);
        let record = entities.projectiles.get(id).unwrap();
        assert!((record.position.z - PROJECTILE_SPEED).abs() < 1e-6);
        assert_eq!(record.payload.age, 1);

        // A stationary projectile can only end by age.
        let still = entities.spawn_projectile(
            Vec3::ZERO,
            Projectile {
                velocity: Vec3::ZERO,
                age: PROJECTILE_MAX_AGE - 1,
                damage: 1.0,
            },
        );
        let report = pass.update_projectiles(&mut player, &mut entities, &sender);
        assert!(report.expired.is_empty());
        assert!(entities.projectiles.contains(still));

        let report = pass.update_projectiles(&mut player, &mut entities, &sender);
        assert_eq!(report.expired, vec![still]);
        assert!(!entities.projectiles.contains(still));
        assert!(entities.projectiles.contains(id));
    }

    #[test]
    fn test_projectile_leaves_world() {
        let (sender, _receiver) = EventBus::create_pair(16);
        let mut entities = EntityRegistries::new();
        let mut player = PlayerState::new();
        let pass = CombatPass::new(&EngineConfig::default());
        let id = entities.spawn_projectile(
            Vec3::ground(249.5, 0.0),
            Projectile {
                velocity: Vec3::ground(1.0, 0.0),
                age: 0,
                damage: 1.0,
            },
        );

        let report = pass.update_projectiles(&mut player, &mut entities, &sender);
        assert_eq!(report.out_of_bounds, vec![id]);
    }

    #[test]
    fn test_hostile_claimed_once() {
        let (sender, _receiver) = EventBus::create_pair(16);
        let mut entities = EntityRegistries::new();
        let mut player = PlayerState::new();
        player.ammo = 0;
        let pass = CombatPass::new(&EngineConfig::default());
        let still = Projectile {
            velocity: Vec3::ZERO,
            age: 0,
            damage: 1.0,
        };
        let first = entities.spawn_projectile(Vec3::ground(10.0, 0.0), still);
        let second = entities.spawn_projectile(Vec3::ground(10.2, 0.0), still);
        let hostile = entities.spawn_hostile(Vec3::ground(10.1, 0.0), None, 50.0);

        let report = pass.update_projectiles(&mut player, &mut entities, &sender);
        assert_eq!(report.kills, vec![(first, hostile)]);
        assert!(entities.projectiles.contains(second));
        assert!(entities.hostiles.is_empty());
        assert_eq!(player.ammo, KILL_AMMO_BONUS);
    }
}
