//! Plain-data entities populating the playfield and the capabilities they share.

use std::ops::RangeInclusive;

use cowboy_shooter_core::{
    EnemyKind, EntityId, Kinematics, Motion, PickupEffect, PickupKind, Playfield, ProjectileKind,
    Rect,
};
use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

const ENEMY_SHOT_INTERVAL: RangeInclusive<u32> = 30..=60;
const ENEMY_MUZZLE_OFFSET: Vec2 = Vec2::new(16.0, 32.0);

/// Shared inputs available to entities while they move.
#[derive(Debug)]
pub struct StepContext<'a> {
    /// Arena the entity moves within.
    pub playfield: &'a Playfield,
    /// Ticks elapsed in the session, including the current one.
    pub elapsed_ticks: u64,
    /// Session random source.
    pub rng: &'a mut ChaCha8Rng,
}

/// Entities that advance by themselves every tick.
pub trait Movable {
    /// Advances the entity by one tick.
    fn step(&mut self, context: &mut StepContext<'_>);

    /// Bounding rectangle after the most recent step.
    fn bounds(&self) -> Rect;
}

/// Entities that lose health when struck.
pub trait Damageable {
    /// Remaining health.
    fn health(&self) -> u32;

    /// Subtracts `amount` from the health, saturating at zero, and returns what is left.
    fn take_damage(&mut self, amount: u32) -> u32;

    /// Whether the entity has no health left.
    fn is_destroyed(&self) -> bool {
        self.health() == 0
    }
}

/// Entities that grant an effect when the player touches them.
pub trait Collectible {
    /// Effect granted on collection.
    fn effect(&self) -> PickupEffect;
}

/// Hostile entity that descends on or flies over the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    motion: Motion,
    body: Kinematics,
    health: u32,
    shot_countdown: Option<u32>,
}

impl Enemy {
    pub(crate) fn new(
        id: EntityId,
        kind: EnemyKind,
        motion: Motion,
        position: Vec2,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let shot_countdown = kind
            .fires_projectiles()
            .then(|| rng.gen_range(ENEMY_SHOT_INTERVAL));
        Self {
            id,
            kind,
            motion,
            body: Kinematics::new(position, kind.size(), kind.base_speed(), kind.max_speed()),
            health: kind.starting_health(),
            shot_countdown,
        }
    }

    /// Identifier of the enemy.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype of the enemy.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Top-left corner of the enemy.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Ticks until the next shot, for enemies that shoot.
    #[must_use]
    pub fn shot_countdown(&self) -> Option<u32> {
        self.shot_countdown
    }

    /// Counts the weapon down and reports whether a shot is due this tick.
    pub(crate) fn reload(&mut self, rng: &mut ChaCha8Rng) -> bool {
        let Some(countdown) = self.shot_countdown.as_mut() else {
            return false;
        };
        *countdown = countdown.saturating_sub(1);
        if *countdown > 0 {
            return false;
        }
        *countdown = rng.gen_range(ENEMY_SHOT_INTERVAL);
        true
    }

    pub(crate) fn muzzle(&self) -> Vec2 {
        self.body.position + ENEMY_MUZZLE_OFFSET
    }
}

impl Movable for Enemy {
    fn step(&mut self, context: &mut StepContext<'_>) {
        cowboy_shooter_system_movement::advance(
            self.motion,
            &mut self.body,
            Some(context.elapsed_ticks),
            &mut *context.rng,
        );
    }

    fn bounds(&self) -> Rect {
        self.body.bounds()
    }
}

impl Damageable for Enemy {
    fn health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }
}

/// Bullet travelling vertically across the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    id: EntityId,
    kind: ProjectileKind,
    bounds: Rect,
}

impl Projectile {
    pub(crate) fn new(id: EntityId, kind: ProjectileKind, origin: Vec2) -> Self {
        Self {
            id,
            kind,
            bounds: Rect::new(origin, kind.size()),
        }
    }

    /// Identifier of the projectile.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype of the projectile.
    #[must_use]
    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }
}

impl Movable for Projectile {
    fn step(&mut self, _context: &mut StepContext<'_>) {
        let origin = self.bounds.origin() + Vec2::new(0.0, self.kind.vertical_velocity());
        self.bounds = Rect::new(origin, self.bounds.size());
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Loot dropped by a destroyed enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    id: EntityId,
    kind: PickupKind,
    bounds: Rect,
}

impl Pickup {
    pub(crate) fn new(id: EntityId, kind: PickupKind, origin: Vec2) -> Self {
        Self {
            id,
            kind,
            bounds: Rect::new(origin, kind.size()),
        }
    }

    /// Identifier of the pickup.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Archetype of the pickup.
    #[must_use]
    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    /// Whether the pickup lies on the floor and can fall no further.
    #[must_use]
    pub fn is_grounded(&self, playfield: &Playfield) -> bool {
        self.bounds.top() >= playfield.pickup_floor()
    }
}

impl Movable for Pickup {
    fn step(&mut self, context: &mut StepContext<'_>) {
        if self.is_grounded(context.playfield) {
            return;
        }
        let origin = self.bounds.origin() + Vec2::new(0.0, PickupKind::FALL_SPEED);
        self.bounds = Rect::new(origin, self.bounds.size());
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Collectible for Pickup {
    fn effect(&self) -> PickupEffect {
        self.kind.effect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn only_eagles_carry_a_weapon() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bandit = Enemy::new(
            EntityId::new(1),
            EnemyKind::Bandit,
            Motion::LinearDescent,
            Vec2::ZERO,
            &mut rng,
        );
        let eagle = Enemy::new(
            EntityId::new(2),
            EnemyKind::Eagle,
            Motion::SinusoidalDrift,
            Vec2::ZERO,
            &mut rng,
        );

        assert_eq!(bandit.shot_countdown(), None);
        let countdown = eagle.shot_countdown().expect("eagles shoot");
        assert!(ENEMY_SHOT_INTERVAL.contains(&countdown));
    }

    #[test]
    fn eagle_fires_when_countdown_expires() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut eagle = Enemy::new(
            EntityId::new(1),
            EnemyKind::Eagle,
            Motion::SinusoidalDrift,
            Vec2::ZERO,
            &mut rng,
        );
        let countdown = eagle.shot_countdown().expect("eagles shoot");

        let shots: Vec<bool> = (0..countdown).map(|_| eagle.reload(&mut rng)).collect();

        assert_eq!(shots.iter().filter(|fired| **fired).count(), 1);
        assert_eq!(shots.last(), Some(&true));
        let next = eagle.shot_countdown().expect("countdown redrawn");
        assert!(ENEMY_SHOT_INTERVAL.contains(&next));
    }

    #[test]
    fn damage_saturates_at_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut bandit = Enemy::new(
            EntityId::new(1),
            EnemyKind::Bandit,
            Motion::ZigZag,
            Vec2::ZERO,
            &mut rng,
        );

        assert_eq!(bandit.take_damage(1), 1);
        assert!(!bandit.is_destroyed());
        assert_eq!(bandit.take_damage(5), 0);
        assert!(bandit.is_destroyed());
    }

    #[test]
    fn pickups_stop_falling_at_the_floor() {
        let playfield = Playfield::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut context = StepContext {
            playfield: &playfield,
            elapsed_ticks: 0,
            rng: &mut rng,
        };
        let mut pickup = Pickup::new(EntityId::new(1), PickupKind::Heal, Vec2::new(10.0, 530.0));

        pickup.step(&mut context);
        assert_eq!(pickup.bounds().top(), 533.0);
        pickup.step(&mut context);
        assert!(pickup.is_grounded(&playfield));
        pickup.step(&mut context);

        assert_eq!(pickup.bounds().top(), 536.0);
    }

    #[test]
    fn projectiles_move_by_their_kind_velocity() {
        let playfield = Playfield::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut context = StepContext {
            playfield: &playfield,
            elapsed_ticks: 0,
            rng: &mut rng,
        };
        let start = Vec2::new(0.0, 100.0);
        let mut bullet = Projectile::new(EntityId::new(1), ProjectileKind::Player, start);
        let mut dropping = Projectile::new(EntityId::new(2), ProjectileKind::Enemy, start);

        bullet.step(&mut context);
        dropping.step(&mut context);

        assert_eq!(bullet.bounds().top(), 95.0);
        assert_eq!(dropping.bounds().top(), 103.0);
    }
}
