//! # DRYLANDS Headless Run
//!
//! Scripted run with no window and no input. The player walks a wide circle
//! around the origin, crossing chunk borders the whole way, and fires ahead
//! every half second.
//!
//! ```bash
//! drylands_headless
//! drylands_headless --config drylands.toml --frames 10000 --armed
//! RUST_LOG=drylands=debug drylands_headless
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use drylands::shared::{Vec3, WeaponKind};
use drylands::{
    Engine, EngineConfig, EngineError, FrameCommand, FrameInput, GameLoop, GameLoopConfig,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Heading change per frame, radians.
const TURN_RATE: f32 = 0.002;

/// Frames between fire requests.
const FIRE_EVERY: u64 = 30;

struct Args {
    config: Option<PathBuf>,
    frames: u64,
    armed: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        frames: GameLoopConfig::default().max_frames,
        armed: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a number")?;
                args.frames = value
                    .parse()
                    .map_err(|_| format!("--frames: not a number: {value}"))?;
            }
            "--armed" => args.armed = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), EngineError> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    let mut engine = Engine::new(config)?;
    if args.armed {
        engine.player_mut().equip(WeaponKind::Ak47);
    }

    let loop_config = GameLoopConfig {
        max_frames: args.frames,
        enable_timing_logs: true,
        ..GameLoopConfig::default()
    };
    let mut game_loop = GameLoop::new(engine, loop_config);

    info!(frames = args.frames, armed = args.armed, "headless run starting");
    let frames = game_loop.run(|frame, _| {
        let heading = frame as f32 * TURN_RATE;
        let forward = Vec3::ground(heading.sin(), heading.cos());
        FrameCommand {
            input: FrameInput::walking(forward),
            fire: (frame % FIRE_EVERY == 0).then_some(forward),
        }
    })?;

    let engine = game_loop.engine();
    let hud = engine.snapshot();
    info!(
        frames,
        state = hud.state.name(),
        health = hud.health,
        hunger = hud.hunger,
        ammo = hud.ammo,
        weapon = hud.weapon_name.unwrap_or("none"),
        resources = hud.resources_collected,
        treasures = hud.treasures_found,
        resident_chunks = engine.chunks().len(),
        live_entities = engine.entities().len(),
        dropped_events = engine.dropped_events(),
        "headless run finished"
    );

    println!();
    game_loop.stats().print_summary();
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: drylands_headless [--config <path.toml>] [--frames <n>] [--armed]");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "headless run failed");
            ExitCode::FAILURE
        }
    }
}
