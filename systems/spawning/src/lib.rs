#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director responsible for emitting enemy spawn commands.
//!
//! The director runs once per simulated tick. A countdown decides when the
//! next batch appears, a slowly advancing phase angle modulates how large
//! ground clusters are, and the elapsed time selects the wave bucket that new
//! enemies are credited to.

use cowboy_shooter_core::{
    Command, EnemyKind, Motion, Playfield, TICKS_PER_SECOND, WAVE_LENGTH_TICKS,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of wave buckets cycled through when no other count is configured.
pub const DEFAULT_WAVE_COUNT: usize = 3;

const GROUND_SEGMENTS: u32 = 4;
const GROUND_CLUSTER_PROBABILITY: f64 = 0.6;
const ZIG_ZAG_PROBABILITY: f64 = 0.3;
const PHASE_STEP: f64 = 0.0005;
const MAX_SPAWN_INTERVAL_SECONDS: u64 = 60;
const MIN_SPAWN_INTERVAL_TICKS: u64 = 30;

/// Ticks between two spawn decisions after `elapsed_ticks` of play.
///
/// Shrinks by one tick per elapsed second and never drops below 30 ticks.
#[must_use]
pub fn spawn_interval(elapsed_ticks: u64) -> u64 {
    let elapsed_seconds = elapsed_ticks / TICKS_PER_SECOND;
    MAX_SPAWN_INTERVAL_SECONDS
        .saturating_sub(elapsed_seconds)
        .max(MIN_SPAWN_INTERVAL_TICKS)
}

/// Smooth oscillation in `0.0..=1.0` derived from the phase angle.
#[must_use]
pub fn wave_factor(phase: f64) -> f64 {
    (phase.sin() + 1.0) / 2.0
}

/// Number of ground enemies spawned together for the provided wave factor.
#[must_use]
pub fn ground_batch_size(wave_factor: f64) -> u32 {
    let extra = (wave_factor.clamp(0.0, 1.0) * 3.0).floor() as u32;
    (1 + extra).min(GROUND_SEGMENTS)
}

/// Wave bucket that receives spawns after `elapsed_ticks` of play.
#[must_use]
pub fn wave_index(elapsed_ticks: u64, wave_count: usize) -> usize {
    let wave_count = wave_count.max(1) as u64;
    ((elapsed_ticks / WAVE_LENGTH_TICKS) % wave_count) as usize
}

/// Phase angle reached once the director has handled `ticks` ticks.
fn phase_after(ticks: u64) -> f64 {
    ticks as f64 * PHASE_STEP
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    wave_count: usize,
}

impl Config {
    /// Creates a configuration with the provided seed and the default wave count.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            wave_count: DEFAULT_WAVE_COUNT,
        }
    }

    /// Overrides the number of wave buckets cycled through.
    #[must_use]
    pub const fn with_wave_count(mut self, wave_count: usize) -> Self {
        self.wave_count = wave_count;
        self
    }
}

/// Pure system that emits spawn commands while a session is being played.
#[derive(Debug)]
pub struct Spawning {
    countdown: u64,
    handled: u64,
    wave_count: usize,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            countdown: 0,
            handled: 0,
            wave_count: config.wave_count.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Ticks left before the next spawn decision.
    #[must_use]
    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    /// Advances the director by one tick and emits any spawn commands that fall due.
    pub fn handle(&mut self, elapsed_ticks: u64, playfield: &Playfield, out: &mut Vec<Command>) {
        self.handled = self.handled.saturating_add(1);
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        self.countdown = spawn_interval(elapsed_ticks);

        let wave = wave_index(elapsed_ticks, self.wave_count);
        if self.rng.gen_bool(GROUND_CLUSTER_PROBABILITY) {
            self.spawn_ground_cluster(playfield, wave, out);
        } else {
            self.spawn_air_enemy(playfield, wave, out);
        }
    }

    fn spawn_ground_cluster(&mut self, playfield: &Playfield, wave: usize, out: &mut Vec<Command>) {
        let size = EnemyKind::Bandit.size();
        let segment = playfield.width() / GROUND_SEGMENTS as f32;
        let max_jitter = segment / 4.0;
        let batch = ground_batch_size(wave_factor(phase_after(self.handled)));
        log::debug!("spawning {batch} bandits into wave {wave}");

        for index in 0..batch {
            let center = segment * (index as f32 + 0.5);
            let jitter = self.rng.gen_range(-max_jitter..=max_jitter);
            let x = playfield.clamp_x(center - size.x / 2.0 + jitter, size.x);
            let motion = if self.rng.gen_bool(ZIG_ZAG_PROBABILITY) {
                Motion::ZigZag
            } else {
                Motion::LinearDescent
            };
            out.push(Command::SpawnEnemy {
                kind: EnemyKind::Bandit,
                motion,
                position: Vec2::new(x, 0.0),
                wave,
            });
        }
    }

    fn spawn_air_enemy(&mut self, playfield: &Playfield, wave: usize, out: &mut Vec<Command>) {
        let size = EnemyKind::Eagle.size();
        let max_x = (playfield.width() - size.x).max(0.0);
        let x = self.rng.gen_range(0.0..=max_x);
        log::debug!("spawning an eagle into wave {wave}");
        out.push(Command::SpawnEnemy {
            kind: EnemyKind::Eagle,
            motion: Motion::SinusoidalDrift,
            position: Vec2::new(x, 0.0),
            wave,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_starts_at_one_second() {
        assert_eq!(spawn_interval(0), 60);
        assert_eq!(spawn_interval(59), 60);
        assert_eq!(spawn_interval(60), 59);
    }

    #[test]
    fn interval_bottoms_out_at_half_a_second() {
        assert_eq!(spawn_interval(30 * 60), 30);
        assert_eq!(spawn_interval(10_000 * 60), 30);
    }

    #[test]
    fn batch_size_tracks_wave_factor() {
        assert_eq!(ground_batch_size(0.0), 1);
        assert_eq!(ground_batch_size(0.34), 2);
        assert_eq!(ground_batch_size(0.67), 3);
        assert_eq!(ground_batch_size(1.0), 4);
    }

    #[test]
    fn wave_factor_is_normalised() {
        assert_eq!(wave_factor(0.0), 0.5);
        assert!((wave_factor(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn phase_does_not_drift_over_long_sessions() {
        let ten_hours = 10 * 60 * 60 * TICKS_PER_SECOND;

        assert_eq!(phase_after(0), 0.0);
        assert!((phase_after(2_000) - 1.0).abs() < 1e-12);
        assert!((phase_after(ten_hours) - 1_080.0).abs() < 1e-9);
    }

    #[test]
    fn wave_index_cycles_through_buckets() {
        assert_eq!(wave_index(0, 3), 0);
        assert_eq!(wave_index(1_799, 3), 0);
        assert_eq!(wave_index(1_800, 3), 1);
        assert_eq!(wave_index(5_400, 3), 0);
        assert_eq!(wave_index(5_400, 0), 0, "zero buckets behaves like one");
    }

    #[test]
    fn countdown_resets_after_each_decision() {
        let mut spawning = Spawning::new(Config::new(1));
        let mut commands = Vec::new();

        spawning.handle(0, &Playfield::default(), &mut commands);

        assert!(!commands.is_empty(), "first tick spawns immediately");
        assert_eq!(spawning.countdown(), 60);
    }
}
