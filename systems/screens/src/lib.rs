#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Screen state machine gating when the Cowboy Shooter simulation runs.
//!
//! Exactly one [`Screen`] is active at a time and only its behaviour handles
//! input. The machine owns the current [`Session`]; starting or restarting a
//! game replaces the session wholesale.

use cowboy_shooter_core::{Command, Event, FrameInput, Playfield, Rect};
use cowboy_shooter_system_notifications::{reports_game_over, Notifications, Scoreboard};
use cowboy_shooter_system_spawning::{Config as SpawningConfig, Spawning};
use cowboy_shooter_world::{self as world, query, World};
use glam::Vec2;

const SPAWNER_SEED_SALT: u64 = 0x5bd1_e995_9e37_79b9;
const SESSION_SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;
const MENU_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);
const PAUSE_BUTTON_SIZE: Vec2 = Vec2::new(100.0, 30.0);
const PAUSE_BUTTON_MARGIN: f32 = 10.0;
const RESTART_BUTTON_OFFSET: f32 = 40.0;

/// Screens the game can be on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title screen waiting for a new game to start.
    Menu,
    /// A session is being simulated.
    Playing,
    /// The session is frozen until resumed.
    Paused,
    /// The player ran out of health.
    GameOver,
}

/// Intent expressed by clicking a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Begin a new session from the menu.
    Start,
    /// Freeze the running session.
    Pause,
    /// Continue the frozen session.
    Resume,
    /// Replace the finished session with a new one.
    Restart,
}

/// Clickable region owned by a screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    label: &'static str,
    bounds: Rect,
    action: ButtonAction,
}

impl Button {
    const fn new(label: &'static str, bounds: Rect, action: ButtonAction) -> Self {
        Self {
            label,
            bounds,
            action,
        }
    }

    /// Caption drawn on the button.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Region of the playfield the button covers.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Intent triggered by clicking the button.
    #[must_use]
    pub const fn action(&self) -> ButtonAction {
        self.action
    }
}

/// Buttons owned by `screen` when laid out on `playfield`.
#[must_use]
pub fn buttons_for(screen: Screen, playfield: &Playfield) -> Vec<Button> {
    let centre = Vec2::new(playfield.width(), playfield.height()) / 2.0;
    let centred = |offset: f32| {
        Rect::new(
            Vec2::new(centre.x - MENU_BUTTON_SIZE.x / 2.0, centre.y + offset),
            MENU_BUTTON_SIZE,
        )
    };

    match screen {
        Screen::Menu => vec![Button::new(
            "Start",
            centred(-MENU_BUTTON_SIZE.y / 2.0),
            ButtonAction::Start,
        )],
        Screen::Playing => vec![Button::new(
            "Pause",
            Rect::new(
                Vec2::new(
                    playfield.width() - PAUSE_BUTTON_SIZE.x - PAUSE_BUTTON_MARGIN,
                    PAUSE_BUTTON_MARGIN,
                ),
                PAUSE_BUTTON_SIZE,
            ),
            ButtonAction::Pause,
        )],
        Screen::Paused => vec![Button::new(
            "Resume",
            centred(-MENU_BUTTON_SIZE.y / 2.0),
            ButtonAction::Resume,
        )],
        Screen::GameOver => vec![Button::new(
            "Restart",
            centred(RESTART_BUTTON_OFFSET),
            ButtonAction::Restart,
        )],
    }
}

/// Everything that belongs to one play-through.
#[derive(Debug)]
pub struct Session {
    world: World,
    spawning: Spawning,
    scoreboard: Scoreboard,
    notifications: Notifications,
    events: Vec<Event>,
    over: bool,
}

impl Session {
    /// Creates a fresh session whose randomness derives from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(seed),
            spawning: Spawning::new(SpawningConfig::new(seed ^ SPAWNER_SEED_SALT)),
            scoreboard: Scoreboard::new(),
            notifications: Notifications::new(),
            events: Vec::new(),
            over: false,
        }
    }

    /// Authoritative world of the session.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Points scored so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    /// Floating notifications currently visible.
    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Whether the player's health has reached zero.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Applies a command to the world and lets every subscriber drain its events.
    pub fn execute(&mut self, command: Command) {
        let first_new = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);

        let new_events = &self.events[first_new..];
        self.scoreboard.handle(new_events);
        self.notifications
            .handle(new_events, query::player(&self.world).position());
        if reports_game_over(new_events) {
            self.over = true;
        }
    }

    /// Simulates one tick: player intent, then spawning, then movement and collisions.
    pub fn step(&mut self, input: &FrameInput) {
        self.events.clear();

        let mut commands = Vec::new();
        if input.undo {
            commands.push(Command::Undo);
        }
        let direction = input.movement();
        if direction != Vec2::ZERO {
            commands.push(Command::MovePlayer { direction });
        }
        if input.fire {
            commands.push(Command::Shoot);
        }
        self.spawning.handle(
            query::elapsed_ticks(&self.world),
            query::playfield(&self.world),
            &mut commands,
        );
        commands.push(Command::Tick);

        for command in commands {
            self.execute(command);
        }
    }
}

/// Change of the active screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Screen that was active before the update.
    pub from: Screen,
    /// Screen that is active after the update.
    pub to: Screen,
}

/// Owns the active screen and the session it governs.
#[derive(Debug)]
pub struct ScreenMachine {
    screen: Screen,
    session: Session,
    seed: u64,
    generation: u64,
    buttons: Vec<Button>,
}

impl ScreenMachine {
    /// Creates a machine resting on the menu.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let session = Session::new(seed);
        let buttons = buttons_for(Screen::Menu, query::playfield(session.world()));
        Self {
            screen: Screen::Menu,
            session,
            seed,
            generation: 0,
            buttons,
        }
    }

    /// Screen currently governing the tick.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session owned by the machine.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session, for scripted commands.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Buttons of the active screen.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Number of sessions started since the machine was created.
    #[must_use]
    pub fn sessions_started(&self) -> u64 {
        self.generation
    }

    /// Lets the active screen handle one tick of input.
    ///
    /// Returns the transition that happened, if any.
    pub fn update(&mut self, input: &FrameInput) -> Option<Transition> {
        let clicked = self.clicked_action(input);

        let next = match self.screen {
            Screen::Menu if clicked == Some(ButtonAction::Start) => {
                self.start_session();
                Some(Screen::Playing)
            }
            Screen::Menu => None,
            Screen::Playing if input.pause || clicked == Some(ButtonAction::Pause) => {
                Some(Screen::Paused)
            }
            Screen::Playing => {
                self.session.step(input);
                self.session.is_over().then_some(Screen::GameOver)
            }
            Screen::Paused if input.pause || clicked == Some(ButtonAction::Resume) => {
                Some(Screen::Playing)
            }
            Screen::Paused => None,
            Screen::GameOver if clicked == Some(ButtonAction::Restart) => {
                self.start_session();
                Some(Screen::Playing)
            }
            Screen::GameOver => None,
        }?;

        let transition = Transition {
            from: self.screen,
            to: next,
        };
        log::info!("screen changed from {:?} to {:?}", transition.from, transition.to);
        self.screen = next;
        self.buttons = buttons_for(next, query::playfield(self.session.world()));
        Some(transition)
    }

    fn clicked_action(&self, input: &FrameInput) -> Option<ButtonAction> {
        input.clicks.iter().find_map(|click| {
            self.buttons
                .iter()
                .find(|button| button.bounds().contains_point(*click))
                .map(Button::action)
        })
    }

    fn start_session(&mut self) {
        self.generation = self.generation.saturating_add(1);
        let seed = self
            .seed
            .wrapping_add(self.generation.wrapping_mul(SESSION_SEED_STRIDE));
        log::info!("starting session {} with seed {seed:#x}", self.generation);
        self.session = Session::new(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_screen_owns_exactly_one_button() {
        let playfield = Playfield::default();
        for screen in [
            Screen::Menu,
            Screen::Playing,
            Screen::Paused,
            Screen::GameOver,
        ] {
            assert_eq!(buttons_for(screen, &playfield).len(), 1, "{screen:?}");
        }
    }

    #[test]
    fn restart_button_sits_below_the_centre() {
        let buttons = buttons_for(Screen::GameOver, &Playfield::default());

        assert_eq!(
            buttons[0].bounds(),
            Rect::new(Vec2::new(300.0, 340.0), Vec2::new(200.0, 50.0))
        );
    }

    #[test]
    fn pause_button_hugs_the_top_right_corner() {
        let buttons = buttons_for(Screen::Playing, &Playfield::default());

        assert_eq!(buttons[0].bounds().origin(), Vec2::new(690.0, 10.0));
        assert_eq!(buttons[0].action(), ButtonAction::Pause);
    }
}
