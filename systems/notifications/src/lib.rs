#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Subscribers that drain the world's event queue once per tick.
//!
//! Three fixed subscribers live here: the [`Scoreboard`] accumulating points,
//! the [`Notifications`] spawner producing short-lived floating messages, and
//! [`reports_game_over`], the check that decides when a session ends.

use cowboy_shooter_core::{Event, PLAYFIELD_WIDTH};
use glam::Vec2;

/// Number of ticks a notification stays visible.
pub const NOTIFICATION_LIFETIME: u32 = 60;

const DRIFT_PER_TICK: f32 = 0.5;
const WAVE_BANNER_POSITION: Vec2 = Vec2::new(PLAYFIELD_WIDTH / 2.0, 80.0);

/// Accumulates the session score from score events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
}

impl Scoreboard {
    /// Creates a scoreboard starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { score: 0 }
    }

    /// Points accumulated so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Adds the points carried by every score event.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if let Event::ScoreIncreased { points, .. } = event {
                self.score = self.score.saturating_add(*points);
            }
        }
    }
}

/// Reports whether the events contain the player's health reaching zero.
#[must_use]
pub fn reports_game_over(events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::HealthChanged { current: 0, .. }))
}

/// Visual flavour of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Something good happened to the player.
    Reward,
    /// The player lost something.
    Warning,
    /// Neutral progress information.
    Info,
}

/// Short-lived message floating above the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    text: String,
    position: Vec2,
    remaining_ticks: u32,
    tone: Tone,
}

impl Notification {
    fn new(text: impl Into<String>, position: Vec2, tone: Tone) -> Self {
        Self {
            text: text.into(),
            position,
            remaining_ticks: NOTIFICATION_LIFETIME,
            tone,
        }
    }

    /// Message to display.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the message is anchored.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Ticks left before the message disappears.
    #[must_use]
    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// Visual flavour of the message.
    #[must_use]
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Fraction of the lifetime still left, from `1.0` down to `0.0`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.remaining_ticks as f32 / NOTIFICATION_LIFETIME as f32
    }
}

/// Spawns and ages floating notifications.
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    active: Vec<Notification>,
}

impl Notifications {
    /// Creates an empty notification spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications currently visible, oldest first.
    #[must_use]
    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    /// Ages existing notifications once per advanced tick and spawns new ones.
    ///
    /// Messages that concern the player rather than a place on the playfield
    /// are anchored at `player_anchor`.
    pub fn handle(&mut self, events: &[Event], player_anchor: Vec2) {
        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        for _ in 0..ticks {
            self.age();
        }

        for event in events {
            if let Some(notification) = notify(event, player_anchor) {
                self.active.push(notification);
            }
        }
    }

    fn age(&mut self) {
        for notification in &mut self.active {
            notification.remaining_ticks = notification.remaining_ticks.saturating_sub(1);
            notification.position.y -= DRIFT_PER_TICK;
        }
        self.active
            .retain(|notification| notification.remaining_ticks > 0);
    }
}

fn notify(event: &Event, player_anchor: Vec2) -> Option<Notification> {
    let notification = match event {
        Event::ScoreIncreased { points, position } => {
            Notification::new(format!("+{points}"), *position, Tone::Reward)
        }
        Event::HealthChanged { previous, current } if current > previous => Notification::new(
            format!("+{} HP", current - previous),
            player_anchor,
            Tone::Reward,
        ),
        Event::HealthChanged { previous, current } => Notification::new(
            format!("-{} HP", previous - current),
            player_anchor,
            Tone::Warning,
        ),
        Event::BoostStarted { .. } => Notification::new("Boost!", player_anchor, Tone::Reward),
        Event::BoostExtended { .. } => {
            Notification::new("Boost extended", player_anchor, Tone::Reward)
        }
        Event::BoostExpired => Notification::new("Boost expired", player_anchor, Tone::Info),
        Event::WaveChanged { wave } => {
            Notification::new(format!("Wave {}", wave + 1), WAVE_BANNER_POSITION, Tone::Info)
        }
        _ => return None,
    };
    Some(notification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoreboard_sums_score_events() {
        let mut scoreboard = Scoreboard::new();

        scoreboard.handle(&[
            Event::ScoreIncreased {
                points: 10,
                position: Vec2::ZERO,
            },
            Event::TimeAdvanced { tick: 1 },
            Event::ScoreIncreased {
                points: 10,
                position: Vec2::ZERO,
            },
        ]);

        assert_eq!(scoreboard.score(), 20);
    }

    #[test]
    fn only_zero_health_ends_the_game() {
        assert!(!reports_game_over(&[Event::HealthChanged {
            previous: 3,
            current: 2
        }]));
        assert!(reports_game_over(&[Event::HealthChanged {
            previous: 1,
            current: 0
        }]));
    }

    #[test]
    fn notifications_expire_after_their_lifetime() {
        let mut notifications = Notifications::new();
        notifications.handle(&[Event::BoostExpired], Vec2::new(10.0, 100.0));
        assert_eq!(notifications.active().len(), 1);

        for tick in 1..NOTIFICATION_LIFETIME {
            notifications.handle(&[Event::TimeAdvanced { tick: tick.into() }], Vec2::ZERO);
        }
        let last = &notifications.active()[0];
        assert_eq!(last.remaining_ticks(), 1);
        assert!(last.position().y < 100.0, "notifications drift upwards");

        notifications.handle(&[Event::TimeAdvanced { tick: 60 }], Vec2::ZERO);
        assert!(notifications.active().is_empty());
    }

    #[test]
    fn health_notifications_carry_the_signed_difference() {
        let mut notifications = Notifications::new();

        notifications.handle(
            &[
                Event::HealthChanged {
                    previous: 3,
                    current: 2,
                },
                Event::HealthChanged {
                    previous: 2,
                    current: 3,
                },
            ],
            Vec2::ZERO,
        );

        let texts: Vec<&str> = notifications.active().iter().map(Notification::text).collect();
        assert_eq!(texts, vec!["-1 HP", "+1 HP"]);
        assert_eq!(notifications.active()[0].tone(), Tone::Warning);
    }
}
