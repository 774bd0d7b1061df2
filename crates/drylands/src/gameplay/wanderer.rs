//! # Wanderers
//!
//! Civilians that stroll around the structure they spawned next to. Purely
//! cosmetic: they never interact with the player or with each other.
//!
//! Each tick the wander timer counts down. When it reaches zero the heading
//! is nudged by up to `WANDER_HEADING_JITTER` either way and the timer is
//! re-armed from `[WANDER_TIMER_MIN, WANDER_TIMER_MAX)`. Draws come from the
//! wanderer's own RNG, so a wanderer walks the same path every time its
//! chunk is loaded.

use drylands_shared::constants::{
    WANDERER_SPEED, WANDER_HEADING_JITTER, WANDER_TIMER_MAX, WANDER_TIMER_MIN,
};
use drylands_shared::Vec3;

use crate::world::{EntityRegistries, Wanderer};

/// Advances every wanderer by one tick. Returns how many changed heading.
pub fn update_wanderers(entities: &mut EntityRegistries) -> usize {
    let mut turned = 0;
    for record in entities.wanderers.iter_mut() {
        if step_timer(&mut record.payload) {
            turned += 1;
        }
        let heading = record.payload.heading;
        record.position += Vec3::ground(heading.sin(), heading.cos()) * WANDERER_SPEED;
    }
    turned
}

/// Counts the timer down and re-rolls on expiry. Returns true on re-roll.
fn step_timer(wanderer: &mut Wanderer) -> bool {
    wanderer.timer = wanderer.timer.saturating_sub(1);
    if wanderer.timer > 0 {
        return false;
    }
    wanderer.heading += wanderer.roll(-WANDER_HEADING_JITTER, WANDER_HEADING_JITTER);
    wanderer.timer = wanderer.roll_ticks(WANDER_TIMER_MIN, WANDER_TIMER_MAX);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use drylands_shared::ChunkCoord;

    #[test]
    fn test_first_tick_rerolls() {
        let mut wanderer = Wanderer::new(1.0, 42);
        assert!(step_timer(&mut wanderer));
        assert!((WANDER_TIMER_MIN..WANDER_TIMER_MAX).contains(&wanderer.timer));
        assert!((wanderer.heading - 1.0).abs() <= WANDER_HEADING_JITTER);
    }

    #[test]
    fn test_timer_counts_down() {
        let mut wanderer = Wanderer::new(0.0, 7);
        step_timer(&mut wanderer);
        let armed = wanderer.timer;
        let heading = wanderer.heading;

        for _ in 1..armed {
            assert!(!step_timer(&mut wanderer));
        }
        assert_eq!(wanderer.timer, 1);
        assert_eq!(wanderer.heading, heading);
        assert!(step_timer(&mut wanderer));
    }

    #[test]
    fn test_walks_along_heading() {
        let mut entities = EntityRegistries::new();
        let id = entities.spawn_wanderer(Vec3::ZERO, Some(ChunkCoord::new(0, 0)), Wanderer::new(0.0, 1));

        update_wanderers(&mut entities);
        let record = entities.wanderers.get(id).unwrap();
        let heading = record.payload.heading;
        assert!((record.position.x - heading.sin() * WANDERER_SPEED).abs() < 1e-6);
        assert!((record.position.z - heading.cos() * WANDERER_SPEED).abs() < 1e-6);
        assert!((record.position.horizontal_length() - WANDERER_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_path() {
        let mut a = EntityRegistries::new();
        let mut b = EntityRegistries::new();
        let ia = a.spawn_wanderer(Vec3::ZERO, None, Wanderer::new(0.3, 99));
        let ib = b.spawn_wanderer(Vec3::ZERO, None, Wanderer::new(0.3, 99));

        for _ in 0..500 {
            update_wanderers(&mut a);
            update_wanderers(&mut b);
        }
        assert_eq!(a.wanderers.get(ia).unwrap().position, b.wanderers.get(ib).unwrap().position);
    }
}
