//! # Engine
//!
//! The single context value that owns every piece of world state. Nothing
//! is global; tests build a fresh engine each.
//!
//! ## Tick Order
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ 1. facing from look                                              │
//! │ 2. movement (border-checked) and vitals                          │
//! │ 3. streaming: load window, evict beyond hysteresis band          │
//! │ 4. pickups: resources -> structure items -> treasure (victory)   │
//! │ 5. melee contact                                                 │
//! │ 6. projectiles: advance, expire, first-hit kills                 │
//! │ 7. wanderers                                                     │
//! │ 8. death check (defeat)                                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once the state is terminal, [`Engine::tick`] and [`Engine::fire_weapon`]
//! change nothing.

use drylands_shared::Vec3;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::{EventBus, EventReceiver, EventSender, GameEvent};
use crate::gameplay::{
    update_wanderers, CombatPass, FireOutcome, GameState, InteractionPass, PlayerState,
    ProjectileReport,
};
use crate::world::{ChunkRegistry, EntityRegistries, StreamingController, StreamingReport};

/// Input for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Movement intent. Only the horizontal direction matters.
    pub movement: Vec3,
    /// Look direction. Sets the player's facing.
    pub look: Vec3,
}

impl FrameInput {
    /// Input that moves along `movement` and looks the same way.
    #[must_use]
    pub const fn walking(movement: Vec3) -> Self {
        Self {
            movement,
            look: movement,
        }
    }
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// True if the player position changed.
    pub moved: bool,
    /// Streaming work done.
    pub streaming: StreamingReport,
    /// Resources picked up.
    pub resources_collected: u32,
    /// Structure items picked up.
    pub items_collected: u32,
    /// Treasures picked up.
    pub treasures_found: u32,
    /// Hostiles that landed a melee hit.
    pub melee_hits: usize,
    /// Projectile pass results.
    pub projectiles: ProjectileReport,
    /// Wanderers that changed heading.
    pub wanderers_turned: usize,
    /// Game state after the tick.
    pub state: GameState,
}

/// Read-only view for the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Health in `[0, 100]`.
    pub health: f32,
    /// Hunger in `[0, 100]`.
    pub hunger: f32,
    /// Resources picked up.
    pub resources_collected: u32,
    /// Treasures picked up.
    pub treasures_found: u32,
    /// Rounds available.
    pub ammo: u32,
    /// Equipped weapon name.
    pub weapon_name: Option<&'static str>,
    /// Game state.
    pub state: GameState,
}

/// The streaming engine.
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    player: PlayerState,
    entities: EntityRegistries,
    chunks: ChunkRegistry,
    streaming: StreamingController,
    interaction: InteractionPass,
    combat: CombatPass,
    bus: EventBus,
    sender: EventSender,
    ticks: u64,
}

impl Engine {
    /// Creates an engine with a validated config. No chunk is loaded until
    /// the first tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`](crate::error::EngineError::Config) if
    /// the config is out of range.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Creates an engine with the default config.
    #[must_use]
    pub fn with_default() -> Self {
        Self::build(EngineConfig::default())
    }

    fn build(config: EngineConfig) -> Self {
        debug!(?config, "engine created");
        let bus = EventBus::new(config.event_capacity);
        let sender = bus.sender();
        Self {
            state: GameState::Running,
            player: PlayerState::new(),
            entities: EntityRegistries::new(),
            chunks: ChunkRegistry::new(),
            streaming: StreamingController::new(&config),
            interaction: InteractionPass::new(&config),
            combat: CombatPass::new(&config),
            bus,
            sender,
            ticks: 0,
            config,
        }
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Runs one tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Chunk`](crate::error::EngineError::Chunk) if a
    /// chunk in the window could not be materialized. The player is restored
    /// to where it was before the tick and the tick is not counted. Chunks
    /// committed before the failure stay loaded; the failed chunk stays
    /// unloaded and the next tick retries it.
    pub fn tick(&mut self, input: FrameInput) -> EngineResult<TickReport> {
        let mut report = TickReport {
            tick: self.ticks,
            state: self.state,
            ..TickReport::default()
        };
        if self.state.is_terminal() {
            return Ok(report);
        }
        let before = self.player.clone();

        self.player.face(input.look);
        report.moved = self.interaction.apply_movement(&mut self.player, input.movement);
        InteractionPass::apply_vitals(&mut self.player, report.moved);

        report.streaming = match self.streaming.update(
            self.player.position,
            &mut self.chunks,
            &mut self.entities,
            &self.sender,
        ) {
            Ok(streaming) => streaming,
            Err(err) => {
                self.player = before;
                return Err(err.into());
            }
        };
        self.ticks += 1;

        report.resources_collected =
            self.interaction
                .collect_resources(&mut self.player, &mut self.entities, &self.sender);
        report.items_collected =
            self.interaction
                .collect_items(&mut self.player, &mut self.entities, &self.sender);
        report.treasures_found =
            self.interaction
                .collect_treasure(&mut self.player, &mut self.entities, &self.sender);
        if report.treasures_found > 0 {
            self.finish(GameState::Victory);
            report.state = self.state;
            return Ok(report);
        }

        report.melee_hits = self.interaction.apply_melee(&mut self.player, &self.entities).len();
        report.projectiles =
            self.combat
                .update_projectiles(&mut self.player, &mut self.entities, &self.sender);
        report.wanderers_turned = update_wanderers(&mut self.entities);

        if self.player.is_dead() {
            self.finish(GameState::Defeat);
        }
        report.state = self.state;
        Ok(report)
    }

    /// Fires the equipped weapon along `aim` at time `now_ms`.
    pub fn fire_weapon(&mut self, aim: Vec3, now_ms: u64) -> FireOutcome {
        CombatPass::fire(
            &mut self.player,
            &mut self.entities,
            &self.sender,
            !self.state.is_terminal(),
            aim,
            now_ms,
        )
    }

    fn finish(&mut self, state: GameState) {
        self.state = state;
        let final_health = self.player.health().round() as i32;
        info!(
            state = state.name(),
            final_health,
            resources = self.player.resources_collected,
            treasures = self.player.treasures_found,
            ticks = self.ticks,
            "game over"
        );
        self.sender.send(GameEvent::GameOver {
            state,
            final_health,
            resources_collected: self.player.resources_collected,
            treasures_found: self.player.treasures_found,
        });
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// HUD view of the player and game state.
    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            health: self.player.health(),
            hunger: self.player.hunger(),
            resources_collected: self.player.resources_collected,
            treasures_found: self.player.treasures_found,
            ammo: self.player.ammo,
            weapon_name: self.player.weapon_name(),
            state: self.state,
        }
    }

    /// Receiver for outbound events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }

    /// Events dropped because nobody drained the channel.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.sender.dropped_count()
    }

    /// Game state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Ticks run so far. Terminal ticks do not count.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Active config.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Player state.
    #[must_use]
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Mutable player state, for scripted setups.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// Live entities.
    #[must_use]
    pub const fn entities(&self) -> &EntityRegistries {
        &self.entities
    }

    /// Mutable entities, for scripted setups.
    pub fn entities_mut(&mut self) -> &mut EntityRegistries {
        &mut self.entities
    }

    /// Loaded chunks.
    #[must_use]
    pub const fn chunks(&self) -> &ChunkRegistry {
        &self.chunks
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_default()
    }
}
