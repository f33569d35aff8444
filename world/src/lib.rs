#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Cowboy Shooter.
//!
//! The world owns the player and every enemy, projectile and pickup of a
//! single play session. It is mutated exclusively through [`apply`] and
//! observed through the read-only [`query`] module.

mod collision;
pub mod entities;
mod player;

use cowboy_shooter_core::{
    ticks_to_seconds, ActionKind, Command, EnemyKind, EntityId, Event, Motion, Playfield,
    ProjectileKind,
};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use self::entities::{Enemy, Movable, Pickup, Projectile, StepContext};
use self::player::PlayerAction;
pub use self::player::{Player, HISTORY_CAPACITY};

const BASE_DROP_CHANCE: f64 = 0.1;
const DROP_CHANCE_PER_SECOND: f64 = 0.01;
const MAX_DROP_CHANCE: f64 = 0.4;

/// Probability that a destroyed enemy drops a pickup after `elapsed_ticks` of play.
#[must_use]
pub fn drop_chance(elapsed_ticks: u64) -> f64 {
    (BASE_DROP_CHANCE + DROP_CHANCE_PER_SECOND * ticks_to_seconds(elapsed_ticks))
        .min(MAX_DROP_CHANCE)
}

/// Bookkeeping for enemies credited to a single wave bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveGroup {
    spawned: u32,
}

impl WaveGroup {
    /// Number of enemies spawned while this bucket was active.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }
}

/// Represents the authoritative Cowboy Shooter session state.
#[derive(Debug)]
pub struct World {
    playfield: Playfield,
    player: Player,
    enemies: Vec<Enemy>,
    player_projectiles: Vec<Projectile>,
    enemy_projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    waves: Vec<WaveGroup>,
    active_wave: Option<usize>,
    tick_index: u64,
    next_entity_id: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a fresh session on the default playfield.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_playfield(Playfield::default(), seed)
    }

    /// Creates a fresh session on the provided playfield.
    #[must_use]
    pub fn with_playfield(playfield: Playfield, seed: u64) -> Self {
        Self {
            playfield,
            player: Player::spawn(&playfield),
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            pickups: Vec::new(),
            waves: Vec::new(),
            active_wave: None,
            tick_index: 0,
            next_entity_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.player.tick(out_events);

        let mut context = StepContext {
            playfield: &self.playfield,
            elapsed_ticks: self.tick_index,
            rng: &mut self.rng,
        };
        step_all(&mut self.player_projectiles, &mut context);
        step_all(&mut self.enemies, &mut context);
        step_all(&mut self.enemy_projectiles, &mut context);
        step_all(&mut self.pickups, &mut context);

        collision::resolve(self, out_events);
    }

    fn shoot(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.ready_to_shoot() {
            return;
        }
        let id = self.allocate_id();
        self.player_projectiles.push(Projectile::new(
            id,
            ProjectileKind::Player,
            self.player.muzzle(),
        ));
        self.player.record_shot(id);
        out_events.push(Event::ProjectileFired {
            projectile: id,
            kind: ProjectileKind::Player,
        });
    }

    fn undo(&mut self, out_events: &mut Vec<Event>) {
        let Some(action) = self.player.take_last_action() else {
            return;
        };

        match action {
            PlayerAction::Move { from } => {
                self.player.restore_position(from);
                out_events.push(Event::ActionUndone {
                    action: ActionKind::Move,
                });
            }
            PlayerAction::Shoot { projectile } => {
                let before = self.player_projectiles.len();
                self.player_projectiles
                    .retain(|bullet| bullet.id() != projectile);
                if self.player_projectiles.len() == before {
                    log::debug!("bullet {} already spent, nothing to retract", projectile.get());
                    return;
                }
                self.player.reset_shoot_timer();
                out_events.push(Event::ActionUndone {
                    action: ActionKind::Shoot,
                });
            }
        }
    }

    fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        motion: Motion,
        position: Vec2,
        wave: usize,
        out_events: &mut Vec<Event>,
    ) {
        if self.active_wave != Some(wave) {
            self.active_wave = Some(wave);
            log::info!("wave {} is now active", wave + 1);
            out_events.push(Event::WaveChanged { wave });
        }
        if self.waves.len() <= wave {
            self.waves.resize_with(wave + 1, WaveGroup::default);
        }
        self.waves[wave].spawned = self.waves[wave].spawned.saturating_add(1);

        let id = self.allocate_id();
        let position = self.playfield.clamp_origin(position, kind.size());
        let enemy = Enemy::new(id, kind, motion, position, &mut self.rng);
        log::debug!("spawned {kind:?} {} using {motion:?}", id.get());
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            wave,
        });
    }
}

fn step_all<T: Movable>(entities: &mut [T], context: &mut StepContext<'_>) {
    for entity in entities {
        entity.step(context);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance(out_events),
        Command::MovePlayer { direction } => world.player.move_by(direction, &world.playfield),
        Command::Shoot => world.shoot(out_events),
        Command::Undo => world.undo(out_events),
        Command::SpawnEnemy {
            kind,
            motion,
            position,
            wave,
        } => world.spawn_enemy(kind, motion, position, wave, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cowboy_shooter_core::{ticks_to_seconds, Playfield};

    use super::{
        entities::{Enemy, Pickup, Projectile},
        Player, WaveGroup, World,
    };

    /// Arena the session takes place in.
    #[must_use]
    pub fn playfield(world: &World) -> &Playfield {
        &world.playfield
    }

    /// Read-only view of the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Enemies currently on the playfield, in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Bullets fired by the player that are still in flight.
    #[must_use]
    pub fn player_projectiles(world: &World) -> &[Projectile] {
        &world.player_projectiles
    }

    /// Bullets fired by enemies that are still in flight.
    #[must_use]
    pub fn enemy_projectiles(world: &World) -> &[Projectile] {
        &world.enemy_projectiles
    }

    /// Pickups waiting to be collected.
    #[must_use]
    pub fn pickups(world: &World) -> &[Pickup] {
        &world.pickups
    }

    /// Number of ticks simulated since the session started.
    #[must_use]
    pub fn elapsed_ticks(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of seconds simulated since the session started.
    #[must_use]
    pub fn elapsed_seconds(world: &World) -> f64 {
        ticks_to_seconds(world.tick_index)
    }

    /// Wave bucket that received the most recent spawn, if any.
    #[must_use]
    pub fn active_wave(world: &World) -> Option<usize> {
        world.active_wave
    }

    /// Bookkeeping for every wave bucket that received spawns.
    #[must_use]
    pub fn waves(world: &World) -> &[WaveGroup] {
        &world.waves
    }

    /// Current probability that a destroyed enemy drops a pickup.
    #[must_use]
    pub fn drop_chance(world: &World) -> f64 {
        super::drop_chance(world.tick_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_starts_empty() {
        let world = World::new(1);

        assert_eq!(query::elapsed_ticks(&world), 0);
        assert!(query::enemies(&world).is_empty());
        assert_eq!(query::player(&world).health(), Player::starting_health());
        assert_eq!(query::player(&world).position(), Vec2::new(400.0, 536.0));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut world = World::new(1);

        let first = world.allocate_id();
        let second = world.allocate_id();

        assert!(second > first);
    }

    #[test]
    fn drop_chance_starts_at_ten_percent_and_caps() {
        assert_eq!(drop_chance(0), 0.1);
        assert!((drop_chance(600) - 0.2).abs() < 1e-12);
        assert_eq!(drop_chance(60 * 60 * 10), 0.4);
    }

    #[test]
    fn spawns_are_credited_to_their_wave() {
        let mut world = World::new(1);
        let mut events = Vec::new();
        for wave in [0, 0, 2] {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Bandit,
                    motion: Motion::LinearDescent,
                    position: Vec2::new(10.0, 0.0),
                    wave,
                },
                &mut events,
            );
        }

        let tallies: Vec<u32> = query::waves(&world).iter().map(WaveGroup::spawned).collect();
        assert_eq!(tallies, vec![2, 0, 1]);
        assert_eq!(query::active_wave(&world), Some(2));
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::WaveChanged { .. }))
                .count(),
            2
        );
    }
}
