//! Player status, abilities and the reversible action history.

use std::collections::VecDeque;

use cowboy_shooter_core::{EntityId, Event, PickupEffect, Playfield, Rect, ACTOR_SIZE};
use glam::Vec2;

/// Maximum number of reversible actions remembered for undo.
pub const HISTORY_CAPACITY: usize = 32;

const BASE_SPEED: f32 = 2.0;
const STARTING_HEALTH: u32 = 3;
const MAX_HEALTH: u32 = 5;
const BASE_SHOOT_COOLDOWN: u32 = 20;
const MIN_SHOOT_COOLDOWN: u32 = 5;
const MUZZLE_OFFSET: Vec2 = Vec2::new(16.0, 0.0);

/// Reversible action recorded when the player acts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerAction {
    /// The player moved away from `from`.
    Move { from: Vec2 },
    /// The player fired `projectile`.
    Shoot { projectile: EntityId },
}

#[derive(Debug)]
struct ActionHistory {
    entries: VecDeque<PlayerAction>,
}

impl ActionHistory {
    fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    fn record(&mut self, action: PlayerAction) {
        if self.entries.len() == HISTORY_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(action);
    }

    fn pop(&mut self) -> Option<PlayerAction> {
        self.entries.pop_back()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// The avatar controlled by the person playing.
#[derive(Debug)]
pub struct Player {
    position: Vec2,
    size: Vec2,
    base_speed: f32,
    speed_multiplier: f32,
    damage_boost: u32,
    health: u32,
    max_health: u32,
    base_cooldown: u32,
    cooldown: u32,
    shoot_timer: u32,
    boost_active: bool,
    boost_remaining: u32,
    history: ActionHistory,
}

impl Player {
    pub(crate) fn spawn(playfield: &Playfield) -> Self {
        Self {
            position: playfield.player_start(),
            size: ACTOR_SIZE,
            base_speed: BASE_SPEED,
            speed_multiplier: 1.0,
            damage_boost: 1,
            health: STARTING_HEALTH,
            max_health: MAX_HEALTH,
            base_cooldown: BASE_SHOOT_COOLDOWN,
            cooldown: BASE_SHOOT_COOLDOWN,
            shoot_timer: 0,
            boost_active: false,
            boost_remaining: 0,
            history: ActionHistory::new(),
        }
    }

    /// Top-left corner of the player.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Bounding rectangle of the player.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health ceiling that heals cannot exceed.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Health every new session starts with.
    #[must_use]
    pub const fn starting_health() -> u32 {
        STARTING_HEALTH
    }

    /// Multiplier applied to the damage of every bullet.
    #[must_use]
    pub fn damage_boost(&self) -> u32 {
        self.damage_boost
    }

    /// Firing cooldown used when no boost is active.
    #[must_use]
    pub fn base_cooldown(&self) -> u32 {
        self.base_cooldown
    }

    /// Firing cooldown currently in effect.
    #[must_use]
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Ticks left before the next shot is allowed.
    #[must_use]
    pub fn shoot_timer(&self) -> u32 {
        self.shoot_timer
    }

    /// Whether a boost is currently active.
    #[must_use]
    pub fn boost_active(&self) -> bool {
        self.boost_active
    }

    /// Ticks left on the active boost, zero when none is active.
    #[must_use]
    pub fn boost_remaining(&self) -> u32 {
        self.boost_remaining
    }

    /// Number of actions that can currently be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Sole entry point for health mutation.
    ///
    /// Clamps to `0..=max_health` and reports a change only when the clamped
    /// value differs from the current one.
    pub(crate) fn set_health(&mut self, value: u32, out_events: &mut Vec<Event>) {
        let clamped = value.min(self.max_health);
        if clamped == self.health {
            return;
        }
        let previous = self.health;
        self.health = clamped;
        out_events.push(Event::HealthChanged {
            previous,
            current: clamped,
        });
    }

    pub(crate) fn apply_damage(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        self.set_health(self.health.saturating_sub(amount), out_events);
    }

    pub(crate) fn collect(&mut self, effect: PickupEffect, out_events: &mut Vec<Event>) {
        match effect {
            PickupEffect::Boost {
                cooldown_reduction,
                duration,
            } => self.apply_boost(cooldown_reduction, duration, out_events),
            PickupEffect::Heal { amount } => {
                self.set_health(self.health.saturating_add(amount), out_events);
            }
        }
    }

    fn apply_boost(&mut self, cooldown_reduction: u32, duration: u32, out_events: &mut Vec<Event>) {
        if self.boost_active {
            self.boost_remaining = self.boost_remaining.saturating_add(duration);
            out_events.push(Event::BoostExtended {
                remaining: self.boost_remaining,
            });
            return;
        }

        self.cooldown = self
            .base_cooldown
            .saturating_sub(cooldown_reduction)
            .max(MIN_SHOOT_COOLDOWN);
        self.boost_remaining = duration;
        self.boost_active = true;
        out_events.push(Event::BoostStarted { duration });
    }

    /// Advances the timers that run once per tick.
    pub(crate) fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.shoot_timer = self.shoot_timer.saturating_sub(1);

        if !self.boost_active {
            return;
        }
        self.boost_remaining = self.boost_remaining.saturating_sub(1);
        if self.boost_remaining == 0 {
            self.boost_active = false;
            self.cooldown = self.base_cooldown;
            out_events.push(Event::BoostExpired);
        }
    }

    pub(crate) fn move_by(&mut self, direction: Vec2, playfield: &Playfield) {
        if direction == Vec2::ZERO {
            return;
        }
        let from = self.position;
        let step = direction.clamp(Vec2::NEG_ONE, Vec2::ONE)
            * self.base_speed
            * self.speed_multiplier;
        self.position = playfield.clamp_origin(from + step, self.size);
        if self.position != from {
            self.history.record(PlayerAction::Move { from });
        }
    }

    pub(crate) fn ready_to_shoot(&self) -> bool {
        self.shoot_timer == 0
    }

    pub(crate) fn muzzle(&self) -> Vec2 {
        self.position + MUZZLE_OFFSET
    }

    pub(crate) fn record_shot(&mut self, projectile: EntityId) {
        self.shoot_timer = if self.boost_active {
            self.cooldown / 2
        } else {
            self.base_cooldown
        };
        self.history.record(PlayerAction::Shoot { projectile });
    }

    pub(crate) fn take_last_action(&mut self) -> Option<PlayerAction> {
        self.history.pop()
    }

    pub(crate) fn restore_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn reset_shoot_timer(&mut self) {
        self.shoot_timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cowboy_shooter_core::PickupKind;

    fn player() -> Player {
        Player::spawn(&Playfield::default())
    }

    #[test]
    fn health_changes_are_reported_once() {
        let mut player = player();
        let mut events = Vec::new();

        player.set_health(4, &mut events);
        player.set_health(4, &mut events);

        assert_eq!(
            events,
            vec![Event::HealthChanged {
                previous: 3,
                current: 4
            }]
        );
    }

    #[test]
    fn heals_clamp_to_max_health_silently() {
        let mut player = player();
        let mut events = Vec::new();
        player.set_health(5, &mut events);
        events.clear();

        player.collect(PickupEffect::Heal { amount: 1 }, &mut events);

        assert_eq!(player.health(), 5);
        assert!(events.is_empty(), "no change means no event");
    }

    #[test]
    fn damage_never_drops_below_zero() {
        let mut player = player();
        let mut events = Vec::new();

        player.apply_damage(10, &mut events);
        player.apply_damage(1, &mut events);

        assert_eq!(player.health(), 0);
        assert_eq!(
            events,
            vec![Event::HealthChanged {
                previous: 3,
                current: 0
            }]
        );
    }

    #[test]
    fn boost_lowers_cooldown_and_extends_when_stacked() {
        let mut player = player();
        let mut events = Vec::new();
        let boost = PickupEffect::Boost {
            cooldown_reduction: 5,
            duration: 300,
        };

        player.collect(boost, &mut events);
        assert!(player.boost_active());
        assert_eq!(player.cooldown(), 15);
        assert_eq!(player.boost_remaining(), 300);

        for _ in 0..100 {
            player.tick(&mut events);
        }
        player.collect(boost, &mut events);

        assert_eq!(player.boost_remaining(), 500);
        assert_eq!(player.cooldown(), 15, "extension keeps the lowered cooldown");
        assert!(events.contains(&Event::BoostExtended { remaining: 500 }));
    }

    #[test]
    fn boost_expiry_restores_base_cooldown() {
        let mut player = player();
        let mut events = Vec::new();
        player.collect(
            PickupEffect::Boost {
                cooldown_reduction: 5,
                duration: 2,
            },
            &mut events,
        );

        player.tick(&mut events);
        assert!(player.boost_active());
        player.tick(&mut events);

        assert!(!player.boost_active());
        assert_eq!(player.cooldown(), player.base_cooldown());
        assert_eq!(events.last(), Some(&Event::BoostExpired));
    }

    #[test]
    fn cooldown_reduction_respects_minimum() {
        let mut player = player();
        let mut events = Vec::new();
        player.collect(
            PickupEffect::Boost {
                cooldown_reduction: 50,
                duration: 10,
            },
            &mut events,
        );

        assert_eq!(player.cooldown(), MIN_SHOOT_COOLDOWN);
    }

    #[test]
    fn boosted_shots_reset_timer_to_half_cooldown() {
        let mut player = player();
        let mut events = Vec::new();

        player.record_shot(EntityId::new(1));
        assert_eq!(player.shoot_timer(), 20);

        player.reset_shoot_timer();
        player.collect(PickupKind::SpeedBooster.effect(), &mut events);
        player.record_shot(EntityId::new(2));
        assert_eq!(player.shoot_timer(), 7);
    }

    #[test]
    fn movement_is_clamped_to_playfield() {
        let playfield = Playfield::default();
        let mut player = player();

        for _ in 0..400 {
            player.move_by(Vec2::new(1.0, 1.0), &playfield);
        }

        assert_eq!(player.position(), Vec2::new(768.0, 568.0));
    }

    #[test]
    fn history_is_bounded() {
        let playfield = Playfield::default();
        let mut player = player();

        for _ in 0..(HISTORY_CAPACITY + 10) {
            player.move_by(Vec2::new(-1.0, 0.0), &playfield);
        }

        assert_eq!(player.undo_depth(), HISTORY_CAPACITY);
    }

    #[test]
    fn pushing_against_a_wall_is_not_recorded() {
        let playfield = Playfield::default();
        let mut player = player();
        for _ in 0..300 {
            player.move_by(Vec2::new(1.0, 0.0), &playfield);
        }
        let depth = player.undo_depth();
        let pinned = player.position();

        player.move_by(Vec2::new(1.0, 0.0), &playfield);

        assert_eq!(player.position(), pinned);
        assert_eq!(player.undo_depth(), depth);
        assert_eq!(
            player.take_last_action(),
            Some(PlayerAction::Move {
                from: pinned - Vec2::new(2.0, 0.0)
            }),
            "the last real step stays on top"
        );
    }

    #[test]
    fn idle_movement_is_not_recorded() {
        let mut player = player();

        player.move_by(Vec2::ZERO, &Playfield::default());

        assert_eq!(player.undo_depth(), 0);
    }
}
