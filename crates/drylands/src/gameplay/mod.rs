//! # Gameplay Systems
//!
//! This module contains the per-tick passes:
//! - Player state and the game state machine
//! - Movement, vitals, pickups and melee
//! - Weapon fire and projectiles
//! - Wanderer strolling

pub mod combat;
pub mod interaction;
pub mod player;
pub mod wanderer;

pub use combat::{CombatPass, FireOutcome, ProjectileReport};
pub use interaction::InteractionPass;
pub use player::{GameState, PlayerState};
pub use wanderer::update_wanderers;
