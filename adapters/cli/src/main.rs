#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Cowboy Shooter experience.

mod pacing;
mod scene;

use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use cowboy_shooter_core::{Playfield, WINDOW_TITLE};
use cowboy_shooter_rendering::{Presentation, RenderingBackend, Scene};
use cowboy_shooter_rendering_macroquad::MacroquadBackend;
use cowboy_shooter_system_screens::ScreenMachine;

use self::pacing::{FixedStep, InputLatch};

/// Top-down arcade shooter: hold off bandits and eagles for as long as you can.
#[derive(Debug, Parser)]
#[command(name = "cowboy-shooter")]
struct CliArgs {
    /// Seed for every random decision of the game; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// TOML manifest listing sprite textures; placeholders are drawn without one.
    #[arg(long, value_name = "MANIFEST")]
    sprites: Option<PathBuf>,
}

impl CliArgs {
    fn vsync_enabled(&self) -> bool {
        self.vsync || !self.no_vsync
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Entry point for the Cowboy Shooter command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    log::info!("starting {WINDOW_TITLE} with seed {seed}");

    let scene = Scene::new(Playfield::default()).context("failed to create the initial scene")?;
    let presentation = Presentation::new(WINDOW_TITLE, scene::SKY, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync_enabled())
        .with_show_fps(args.show_fps)
        .with_sprite_manifest(args.sprites);

    let mut machine = ScreenMachine::new(seed);
    let mut clock = FixedStep::default();
    let mut latch = InputLatch::default();

    backend.run(presentation, move |frame_dt, input, frame_scene| {
        latch.merge(input);
        for _ in 0..clock.advance(frame_dt) {
            let _ = machine.update(&latch.take());
        }
        scene::populate(frame_scene, &machine);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_is_on_unless_disabled() {
        let parse = |args: &[&str]| {
            CliArgs::try_parse_from(std::iter::once("cowboy-shooter").chain(args.iter().copied()))
                .expect("arguments should parse")
        };

        assert!(parse(&[]).vsync_enabled());
        assert!(!parse(&["--no-vsync"]).vsync_enabled());
        assert!(parse(&["--no-vsync", "--vsync"]).vsync_enabled());
    }

    #[test]
    fn flags_are_parsed() {
        let args = CliArgs::try_parse_from([
            "cowboy-shooter",
            "--seed",
            "42",
            "--show-fps",
            "--sprites",
            "assets/manifest.toml",
        ])
        .expect("arguments should parse");

        assert_eq!(args.seed, Some(42));
        assert!(args.show_fps);
        assert_eq!(args.sprites, Some(PathBuf::from("assets/manifest.toml")));
    }
}
