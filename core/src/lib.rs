#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cowboy Shooter engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for subscribers to react to deterministically.

mod geometry;

use std::{fmt, str::FromStr};

use glam::Vec2;
use thiserror::Error;

pub use geometry::{Playfield, Rect, GROUND_OFFSET};

/// Caption shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Cowboy Shooter";

/// Width of the default playfield.
pub const PLAYFIELD_WIDTH: f32 = 800.0;

/// Height of the default playfield.
pub const PLAYFIELD_HEIGHT: f32 = 600.0;

/// Number of simulation ticks that make up one second of play.
pub const TICKS_PER_SECOND: u64 = 60;

/// Number of ticks each wave bucket stays active before the next one takes over.
pub const WAVE_LENGTH_TICKS: u64 = 1_800;

/// Points awarded for destroying an enemy with a bullet.
pub const SCORE_PER_KILL: u32 = 10;

/// Side length of the square footprint shared by the player and enemies.
pub const ACTOR_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Converts an elapsed tick count into fractional seconds.
#[must_use]
pub fn ticks_to_seconds(ticks: u64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Unique identifier assigned to every spawned entity within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Enemy archetypes that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Ground enemy that walks down the playfield towards the player.
    Bandit,
    /// Air enemy that drifts across the sky and drops bullets.
    Eagle,
}

impl EnemyKind {
    /// Health the enemy starts with.
    #[must_use]
    pub const fn starting_health(self) -> u32 {
        match self {
            Self::Bandit => 2,
            Self::Eagle => 1,
        }
    }

    /// Footprint of the enemy's bounding box.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        ACTOR_SIZE
    }

    /// Speed at which the enemy starts moving.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        1.0
    }

    /// Ceiling the time ramp may raise the enemy's speed to.
    #[must_use]
    pub const fn max_speed(self) -> f32 {
        3.0
    }

    /// Reports whether the enemy periodically fires projectiles at the player.
    #[must_use]
    pub const fn fires_projectiles(self) -> bool {
        matches!(self, Self::Eagle)
    }
}

/// Movement strategies assigned to enemies at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Steady descent with a rare sideways jitter, accelerating with elapsed time.
    LinearDescent,
    /// Rightward drift with a sinusoidal vertical bob.
    SinusoidalDrift,
    /// Steady descent with a cosine sway along the x axis.
    ZigZag,
}

/// Mutable kinematic state moved by a [`Motion`] strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// Top-left corner of the entity.
    pub position: Vec2,
    /// Extent of the entity's bounding box.
    pub size: Vec2,
    /// Current speed in units per tick.
    pub speed: f32,
    /// Speed the entity started with.
    pub base_speed: f32,
    /// Upper bound for the speed ramp.
    pub max_speed: f32,
    /// Phase angle consumed by oscillating strategies, in radians.
    pub angle: f32,
}

impl Kinematics {
    /// Creates kinematic state at rest on its base speed with a zero phase angle.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2, base_speed: f32, max_speed: f32) -> Self {
        Self {
            position,
            size,
            speed: base_speed,
            base_speed,
            max_speed,
            angle: 0.0,
        }
    }

    /// Bounding rectangle derived from the current position.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// Projectile archetypes that can be fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Bullet fired upwards by the player.
    Player,
    /// Bullet dropped downwards by air enemies.
    Enemy,
}

impl ProjectileKind {
    /// Every projectile kind, in declaration order.
    pub const ALL: [Self; 2] = [Self::Player, Self::Enemy];

    /// Footprint of the projectile's bounding box.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        match self {
            Self::Player => Vec2::new(4.0, 8.0),
            Self::Enemy => Vec2::new(8.0, 4.0),
        }
    }

    /// Signed vertical displacement applied every tick.
    #[must_use]
    pub const fn vertical_velocity(self) -> f32 {
        match self {
            Self::Player => -5.0,
            Self::Enemy => 3.0,
        }
    }

    /// Stable lowercase name used by configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Enemy => "enemy",
        }
    }
}

impl fmt::Display for ProjectileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectileKind {
    type Err = FactoryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| FactoryError::UnknownProjectileKind(name.to_owned()))
    }
}

/// Errors raised when an entity is requested by an unrecognised name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// The requested projectile kind does not exist.
    #[error("unknown projectile kind `{0}`")]
    UnknownProjectileKind(String),
}

/// Pickup archetypes that may drop from destroyed enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Temporarily shortens the player's firing cooldown.
    SpeedBooster,
    /// Restores player health.
    Heal,
}

impl PickupKind {
    /// Distance a pickup falls every tick until it reaches the floor.
    pub const FALL_SPEED: f32 = 3.0;

    /// Footprint of the pickup's bounding box.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        match self {
            Self::SpeedBooster => Vec2::new(16.0, 16.0),
            Self::Heal => Vec2::new(32.0, 16.0),
        }
    }

    /// Effect applied to the player on collection.
    #[must_use]
    pub const fn effect(self) -> PickupEffect {
        match self {
            Self::SpeedBooster => PickupEffect::Boost {
                cooldown_reduction: 5,
                duration: 300,
            },
            Self::Heal => PickupEffect::Heal { amount: 1 },
        }
    }
}

/// Payload carried by a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupEffect {
    /// Lowers the firing cooldown for a limited number of ticks.
    Boost {
        /// Ticks removed from the base firing cooldown while the boost lasts.
        cooldown_reduction: u32,
        /// Number of ticks the boost lasts, or extends an active boost by.
        duration: u32,
    },
    /// Restores health up to the player's maximum.
    Heal {
        /// Health points restored.
        amount: u32,
    },
}

/// Reversible player actions recorded in the undo history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// The player moved.
    Move,
    /// The player fired a bullet.
    Shoot,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick: movement followed by collision resolution.
    Tick,
    /// Moves the player along the provided direction.
    MovePlayer {
        /// Direction of travel; each component is expected in `-1.0..=1.0`.
        direction: Vec2,
    },
    /// Requests that the player fire a bullet if the cooldown allows it.
    Shoot,
    /// Reverts the most recent reversible player action.
    Undo,
    /// Spawns an enemy at the provided position.
    SpawnEnemy {
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Movement strategy the enemy keeps for its whole life.
        motion: Motion,
        /// Top-left corner of the new enemy.
        position: Vec2,
        /// Wave bucket credited with the spawn.
        wave: usize,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks elapsed in the session after the advance.
        tick: u64,
    },
    /// Announces that spawns are now credited to a different wave bucket.
    WaveChanged {
        /// Index of the newly active wave bucket.
        wave: usize,
    },
    /// Confirms that an enemy entered the playfield.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EntityId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Wave bucket credited with the spawn.
        wave: usize,
    },
    /// Confirms that a projectile was fired.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: EntityId,
        /// Archetype of the projectile.
        kind: ProjectileKind,
    },
    /// Reports that a bullet struck an enemy that survived the hit.
    EnemyDamaged {
        /// Identifier of the struck enemy.
        enemy: EntityId,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that an enemy was destroyed by player fire.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EntityId,
        /// Archetype of the destroyed enemy.
        kind: EnemyKind,
        /// Last top-left corner occupied by the enemy.
        position: Vec2,
    },
    /// Reports that an enemy rammed the player and was removed.
    EnemyCollided {
        /// Identifier of the removed enemy.
        enemy: EntityId,
    },
    /// Awards points to the session score.
    ScoreIncreased {
        /// Points to add.
        points: u32,
        /// Where the points were earned, for floating feedback.
        position: Vec2,
    },
    /// Reports the outcome of the loot roll made for a destroyed enemy.
    DropRolled {
        /// Identifier of the destroyed enemy.
        enemy: EntityId,
        /// Pickup kind that dropped, if the roll succeeded.
        pickup: Option<PickupKind>,
    },
    /// Confirms that a pickup appeared on the playfield.
    PickupDropped {
        /// Identifier allocated to the pickup.
        pickup: EntityId,
        /// Archetype of the pickup.
        kind: PickupKind,
        /// Top-left corner of the pickup.
        position: Vec2,
    },
    /// Confirms that the player collected a pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: EntityId,
        /// Archetype of the collected pickup.
        kind: PickupKind,
    },
    /// Reports that the player's health changed value.
    HealthChanged {
        /// Health before the change.
        previous: u32,
        /// Health after the change.
        current: u32,
    },
    /// Reports that a boost became active.
    BoostStarted {
        /// Ticks the boost lasts.
        duration: u32,
    },
    /// Reports that an active boost was extended.
    BoostExtended {
        /// Ticks left after the extension.
        remaining: u32,
    },
    /// Reports that the active boost ran out.
    BoostExpired,
    /// Confirms that a recorded player action was reverted.
    ActionUndone {
        /// Kind of action that was reverted.
        action: ActionKind,
    },
}

/// Input snapshot gathered by adapters before each simulation step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Whether the move-left key is held.
    pub left: bool,
    /// Whether the move-right key is held.
    pub right: bool,
    /// Whether the move-up key is held.
    pub up: bool,
    /// Whether the move-down key is held.
    pub down: bool,
    /// Whether the fire key is held.
    pub fire: bool,
    /// Whether the pause key was pressed during this frame.
    pub pause: bool,
    /// Whether the undo key was pressed during this frame.
    pub undo: bool,
    /// Pointer clicks registered during this frame, in playfield coordinates.
    pub clicks: Vec<Vec2>,
}

impl FrameInput {
    /// Direction requested by the held movement keys.
    #[must_use]
    pub fn movement(&self) -> Vec2 {
        let axis = |negative: bool, positive: bool| {
            f32::from(u8::from(positive)) - f32::from(u8::from(negative))
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Copy of the snapshot that keeps held keys but drops one-shot presses and clicks.
    #[must_use]
    pub fn held_only(&self) -> Self {
        Self {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            fire: self.fire,
            pause: false,
            undo: false,
            clicks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_kinds_resolve_by_name() {
        assert_eq!("player".parse::<ProjectileKind>(), Ok(ProjectileKind::Player));
        assert_eq!("enemy".parse::<ProjectileKind>(), Ok(ProjectileKind::Enemy));
    }

    #[test]
    fn unknown_projectile_kind_is_rejected() {
        let error = "laser"
            .parse::<ProjectileKind>()
            .expect_err("unknown kinds must not resolve");

        assert_eq!(error, FactoryError::UnknownProjectileKind("laser".to_owned()));
        assert_eq!(error.to_string(), "unknown projectile kind `laser`");
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let input = FrameInput {
            left: true,
            right: true,
            down: true,
            ..FrameInput::default()
        };

        assert_eq!(input.movement(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn held_only_discards_one_shot_input() {
        let input = FrameInput {
            fire: true,
            pause: true,
            undo: true,
            clicks: vec![Vec2::new(1.0, 2.0)],
            ..FrameInput::default()
        };
        let held = input.held_only();

        assert!(held.fire);
        assert!(!held.pause && !held.undo);
        assert!(held.clicks.is_empty());
    }

    #[test]
    fn pickups_carry_their_payloads() {
        assert_eq!(
            PickupKind::SpeedBooster.effect(),
            PickupEffect::Boost {
                cooldown_reduction: 5,
                duration: 300
            }
        );
        assert_eq!(PickupKind::Heal.effect(), PickupEffect::Heal { amount: 1 });
    }

    #[test]
    fn entity_id_round_trips_value() {
        assert_eq!(EntityId::new(7).get(), 7);
    }
}
