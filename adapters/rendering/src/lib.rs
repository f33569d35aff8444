#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Cowboy Shooter adapters.
//!
//! The simulation never talks to a window directly. Every frame the entry
//! point fills a [`Scene`] from read-only world queries and hands it to a
//! [`RenderingBackend`], which draws it and reports the next [`FrameInput`].

use std::{fmt, str::FromStr, time::Duration};

use anyhow::Result as AnyResult;
use cowboy_shooter_core::{EnemyKind, PickupKind, Playfield, ProjectileKind, Rect};
pub use cowboy_shooter_core::FrameInput;
use glam::Vec2;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Identifies a texture in the resource set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// The player avatar.
    Cowboy,
    /// Ground enemy.
    Bandit,
    /// Air enemy.
    Eagle,
    /// Pickup that shortens the shoot cooldown.
    Booster,
    /// Pickup that restores health; doubles as the HUD heart icon.
    Heal,
}

impl SpriteKey {
    /// Every sprite key, in manifest order.
    pub const ALL: [Self; 5] = [
        Self::Cowboy,
        Self::Bandit,
        Self::Eagle,
        Self::Booster,
        Self::Heal,
    ];

    /// Key used for the sprite in resource manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cowboy => "cowboy",
            Self::Bandit => "bandit",
            Self::Eagle => "eagle",
            Self::Booster => "booster",
            Self::Heal => "heal",
        }
    }

    /// Sprite used to draw an enemy of the provided kind.
    #[must_use]
    pub const fn for_enemy(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Bandit => Self::Bandit,
            EnemyKind::Eagle => Self::Eagle,
        }
    }

    /// Sprite used to draw a pickup of the provided kind.
    #[must_use]
    pub const fn for_pickup(kind: PickupKind) -> Self {
        match kind {
            PickupKind::SpeedBooster => Self::Booster,
            PickupKind::Heal => Self::Heal,
        }
    }
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpriteKey {
    type Err = RenderingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| RenderingError::UnknownSprite(name.to_owned()))
    }
}

/// Player state that changes how the avatar is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerStatus {
    /// Whether a speed boost is currently running.
    pub boost_active: bool,
}

/// Textured entity placed on the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Texture to draw.
    pub key: SpriteKey,
    /// Region covered by the sprite, in playfield units.
    pub bounds: Rect,
    /// Present only for the player avatar.
    pub player: Option<PlayerStatus>,
}

impl SceneSprite {
    /// Creates a sprite that carries no player status.
    #[must_use]
    pub const fn new(key: SpriteKey, bounds: Rect) -> Self {
        Self {
            key,
            bounds,
            player: None,
        }
    }

    /// Creates the player avatar sprite.
    #[must_use]
    pub const fn player(bounds: Rect, status: PlayerStatus) -> Self {
        Self {
            key: SpriteKey::Cowboy,
            bounds,
            player: Some(status),
        }
    }
}

/// Bullet drawn as a flat rectangle in its kind's palette color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Who fired the bullet.
    pub kind: ProjectileKind,
    /// Region covered by the bullet, in playfield units.
    pub bounds: Rect,
}

/// Horizontal placement of a text line relative to its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position marks the left end of the baseline.
    Left,
    /// The position marks the middle of the baseline.
    Center,
}

/// Line of text drawn over the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneText {
    /// Contents of the line.
    pub text: String,
    /// Baseline anchor point, in playfield units.
    pub position: Vec2,
    /// Font size in playfield units.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// How the line is aligned around `position`.
    pub anchor: TextAnchor,
}

impl SceneText {
    /// Creates a left-aligned line of text.
    #[must_use]
    pub fn new(text: impl Into<String>, position: Vec2, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            position,
            size,
            color,
            anchor: TextAnchor::Left,
        }
    }

    /// Centres the line horizontally on its position.
    #[must_use]
    pub fn centered(mut self) -> Self {
        self.anchor = TextAnchor::Center;
        self
    }
}

/// Clickable button drawn with a centred caption.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneButton {
    /// Caption drawn inside the button.
    pub label: String,
    /// Region covered by the button, in playfield units.
    pub bounds: Rect,
}

/// Scene description assembled once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena the scene is laid out on.
    pub playfield: Playfield,
    /// Player, enemies and pickups.
    pub sprites: Vec<SceneSprite>,
    /// Bullets of both sides.
    pub projectiles: Vec<SceneProjectile>,
    /// Icons drawn in the heads-up display above the playfield content.
    pub hud_icons: Vec<SceneSprite>,
    /// Translucent color covering the playfield beneath overlay text, if any.
    pub dim: Option<Color>,
    /// Text drawn after everything else.
    pub texts: Vec<SceneText>,
    /// Buttons of the active screen.
    pub buttons: Vec<SceneButton>,
}

impl Scene {
    /// Creates an empty scene for the provided playfield.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidPlayfield`] when either dimension is not positive.
    pub fn new(playfield: Playfield) -> Result<Self, RenderingError> {
        if playfield.width() <= 0.0 || playfield.height() <= 0.0 {
            return Err(RenderingError::InvalidPlayfield {
                width: playfield.width(),
                height: playfield.height(),
            });
        }

        Ok(Self {
            playfield,
            sprites: Vec::new(),
            projectiles: Vec::new(),
            hud_icons: Vec::new(),
            dim: None,
            texts: Vec::new(),
            buttons: Vec::new(),
        })
    }

    /// Removes all content while keeping the playfield.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.projectiles.clear();
        self.hud_icons.clear();
        self.dim = None;
        self.texts.clear();
        self.buttons.clear();
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Cowboy Shooter scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and rebuilds the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// A scene needs a playfield with positive dimensions.
    #[error("playfield must have positive dimensions (received {width}x{height})")]
    InvalidPlayfield {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// A resource manifest named a sprite that does not exist.
    #[error("unknown sprite `{0}`")]
    UnknownSprite(String),
}
