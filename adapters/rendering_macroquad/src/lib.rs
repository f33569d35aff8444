#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Cowboy Shooter.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The backend owns the window, polls the keyboard and mouse, and draws the
//! scene it is handed. Without a resource manifest every sprite is drawn as a
//! flat-colour placeholder.

mod sprites;

use std::{path::PathBuf, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use cowboy_shooter_core::{Playfield, Rect};
use cowboy_shooter_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SceneButton, SceneProjectile,
    SceneSprite, SceneText, SpriteKey, TextAnchor,
};
use glam::Vec2;
use macroquad::{
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};

use self::sprites::ResourceSet;

const GROUND_COLOR: Color = Color::from_rgb_u8(194, 160, 100);
const BUTTON_COLOR: Color = Color::from_rgb_u8(0, 255, 0);
const BUTTON_BORDER_COLOR: Color = Color::from_rgb_u8(0, 0, 0);
const BUTTON_BORDER_THICKNESS: f32 = 2.0;
const BUTTON_FONT_SIZE: f32 = 24.0;
const BOOSTED_TINT: Color = Color::new(0.75, 1.0, 0.75, 1.0);
const UNTINTED: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// One-shot key presses polled once per frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `P` toggles pause.
    pause: bool,
    /// `Z` reverts the last player action.
    undo: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            pause: is_key_pressed(KeyCode::P),
            undo: is_key_pressed(KeyCode::Z),
        }
    }
}

/// Keys that act for as long as they are held.
#[derive(Clone, Copy, Debug, Default)]
struct HeldKeys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire: bool,
}

impl HeldKeys {
    fn poll() -> Self {
        Self {
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            fire: is_key_down(KeyCode::Space),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    sprite_manifest: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Loads textures from the manifest at `path` instead of drawing placeholders.
    #[must_use]
    pub fn with_sprite_manifest(mut self, path: Option<PathBuf>) -> Self {
        self.sprite_manifest = path;
        self
    }
}

/// Counts rendered frames and reports the rate once per second.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.playfield.width().round() as i32,
            window_height: scene.playfield.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (resources_sender, resources_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let resources = match sprite_manifest {
                Some(path) => ResourceSet::from_manifest_path(&path).with_context(|| {
                    format!("failed to load resources from {}", path.display())
                }),
                None => Ok(ResourceSet::placeholders()),
            };
            let resources = match resources {
                Ok(resources) => {
                    let _ = resources_sender.send(Ok(()));
                    resources
                }
                Err(error) => {
                    let _ = resources_sender.send(Err(error));
                    return;
                }
            };

            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let metrics = SceneMetrics::new(&scene.playfield, screen_width, screen_height);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(&metrics, keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                draw_ground(&scene.playfield, &metrics);
                draw_sprites(&scene.sprites, &metrics, &resources);
                draw_projectiles(&scene.projectiles, &metrics, &resources);
                draw_sprites(&scene.hud_icons, &metrics, &resources);
                if let Some(dim) = scene.dim {
                    draw_rect(scene.playfield.bounds(), &metrics, dim);
                }
                draw_buttons(&scene.buttons, &metrics);
                draw_texts(&scene.texts, &metrics);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        resources_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Maps playfield units onto the window, letterboxing to keep the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    extent: Vec2,
}

impl SceneMetrics {
    fn new(playfield: &Playfield, screen_width: f32, screen_height: f32) -> Self {
        let extent = Vec2::new(playfield.width(), playfield.height());
        let scale = if extent.x <= f32::EPSILON || extent.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / extent.x).min(screen_height / extent.y)
        };
        let offset = ((Vec2::new(screen_width, screen_height) - extent * scale) * 0.5)
            .max(Vec2::ZERO);

        Self {
            scale,
            offset,
            extent,
        }
    }

    pub(crate) fn scale(&self) -> f32 {
        self.scale
    }

    pub(crate) fn to_screen(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn to_playfield(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let point = (screen - self.offset) / self.scale;
        let inside =
            point.x >= 0.0 && point.y >= 0.0 && point.x < self.extent.x && point.y < self.extent.y;
        inside.then_some(point)
    }
}

fn gather_frame_input(metrics: &SceneMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let click = is_mouse_button_pressed(MouseButton::Left).then(|| {
        let (cursor_x, cursor_y) = mouse_position();
        Vec2::new(cursor_x, cursor_y)
    });
    gather_frame_input_from_observations(metrics, HeldKeys::poll(), keyboard, click)
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    held: HeldKeys,
    keyboard: KeyboardShortcuts,
    click: Option<Vec2>,
) -> FrameInput {
    FrameInput {
        left: held.left,
        right: held.right,
        up: held.up,
        down: held.down,
        fire: held.fire,
        pause: keyboard.pause,
        undo: keyboard.undo,
        clicks: click
            .and_then(|position| metrics.to_playfield(position))
            .into_iter()
            .collect(),
    }
}

fn draw_rect(bounds: Rect, metrics: &SceneMetrics, color: Color) {
    let origin = metrics.to_screen(bounds.origin());
    let size = bounds.size() * metrics.scale();
    draw_rectangle(origin.x, origin.y, size.x, size.y, to_macroquad_color(color));
}

fn draw_ground(playfield: &Playfield, metrics: &SceneMetrics) {
    let floor = playfield.pickup_floor();
    draw_rect(
        Rect::new(
            Vec2::new(0.0, floor),
            Vec2::new(playfield.width(), playfield.height() - floor),
        ),
        metrics,
        GROUND_COLOR,
    );
}

fn placeholder_color(key: SpriteKey) -> Color {
    match key {
        SpriteKey::Cowboy => Color::from_rgb_u8(160, 100, 45),
        SpriteKey::Bandit => Color::from_rgb_u8(70, 70, 70),
        SpriteKey::Eagle => Color::from_rgb_u8(90, 55, 25),
        SpriteKey::Booster => Color::from_rgb_u8(40, 180, 70),
        SpriteKey::Heal => Color::from_rgb_u8(220, 40, 60),
    }
}

fn draw_sprites(sprites: &[SceneSprite], metrics: &SceneMetrics, resources: &ResourceSet) {
    for sprite in sprites {
        let boosted = sprite.player.is_some_and(|status| status.boost_active);
        match resources.atlas() {
            Some(atlas) => {
                let tint = if boosted { BOOSTED_TINT } else { UNTINTED };
                if let Err(error) = atlas.draw(sprite.key, sprite.bounds, metrics, tint) {
                    log::warn!("{error:#}");
                }
            }
            None => {
                let color = placeholder_color(sprite.key);
                let color = if boosted { color.lighten(0.35) } else { color };
                draw_rect(sprite.bounds, metrics, color);
            }
        }
    }
}

fn draw_projectiles(
    projectiles: &[SceneProjectile],
    metrics: &SceneMetrics,
    resources: &ResourceSet,
) {
    for projectile in projectiles {
        draw_rect(
            projectile.bounds,
            metrics,
            resources.palette().color(projectile.kind),
        );
    }
}

fn draw_buttons(buttons: &[SceneButton], metrics: &SceneMetrics) {
    for button in buttons {
        draw_rect(button.bounds, metrics, BUTTON_COLOR);
        let origin = metrics.to_screen(button.bounds.origin());
        let size = button.bounds.size() * metrics.scale();
        draw_rectangle_lines(
            origin.x,
            origin.y,
            size.x,
            size.y,
            BUTTON_BORDER_THICKNESS,
            to_macroquad_color(BUTTON_BORDER_COLOR),
        );

        let centre = button.bounds.center();
        let caption = SceneText::new(
            button.label.clone(),
            Vec2::new(centre.x, centre.y + BUTTON_FONT_SIZE / 3.0),
            BUTTON_FONT_SIZE,
            BUTTON_BORDER_COLOR,
        )
        .centered();
        draw_texts(std::slice::from_ref(&caption), metrics);
    }
}

fn draw_texts(texts: &[SceneText], metrics: &SceneMetrics) {
    for text in texts {
        let font_size = text.size * metrics.scale();
        let mut position = metrics.to_screen(text.position);
        if text.anchor == TextAnchor::Center {
            let dimensions = measure_text(&text.text, None, font_size.round() as u16, 1.0);
            position.x -= dimensions.width / 2.0;
        }
        let _ = draw_text(
            &text.text,
            position.x,
            position.y,
            font_size,
            to_macroquad_color(text.color),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_for(screen_width: f32, screen_height: f32) -> SceneMetrics {
        SceneMetrics::new(&Playfield::default(), screen_width, screen_height)
    }

    #[test]
    fn metrics_letterbox_wide_windows() {
        let metrics = metrics_for(1_600.0, 600.0);

        assert_eq!(metrics.scale(), 1.0);
        assert_eq!(metrics.to_screen(Vec2::ZERO), Vec2::new(400.0, 0.0));
    }

    #[test]
    fn metrics_scale_uniformly() {
        let metrics = metrics_for(1_600.0, 1_200.0);

        assert_eq!(metrics.scale(), 2.0);
        assert_eq!(
            metrics.to_screen(Vec2::new(400.0, 300.0)),
            Vec2::new(800.0, 600.0)
        );
    }

    #[test]
    fn clicks_map_back_into_playfield_units() {
        let metrics = metrics_for(1_600.0, 1_200.0);

        assert_eq!(
            metrics.to_playfield(Vec2::new(800.0, 600.0)),
            Some(Vec2::new(400.0, 300.0))
        );
        assert_eq!(metrics.to_playfield(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(metrics.to_playfield(Vec2::new(1_600.0, 10.0)), None);
    }

    #[test]
    fn observations_become_frame_input() {
        let metrics = metrics_for(800.0, 600.0);
        let held = HeldKeys {
            left: true,
            fire: true,
            ..HeldKeys::default()
        };
        let keyboard = KeyboardShortcuts {
            undo: true,
            ..KeyboardShortcuts::default()
        };

        let input = gather_frame_input_from_observations(
            &metrics,
            held,
            keyboard,
            Some(Vec2::new(10.0, 20.0)),
        );

        assert_eq!(input.movement(), Vec2::new(-1.0, 0.0));
        assert!(input.fire);
        assert!(input.undo);
        assert!(!input.pause);
        assert_eq!(input.clicks, vec![Vec2::new(10.0, 20.0)]);
    }

    #[test]
    fn clicks_outside_the_playfield_are_dropped() {
        let metrics = metrics_for(1_600.0, 600.0);

        let input = gather_frame_input_from_observations(
            &metrics,
            HeldKeys::default(),
            KeyboardShortcuts::default(),
            Some(Vec2::new(100.0, 100.0)),
        );

        assert!(input.clicks.is_empty());
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), Some(4.0));
        assert_eq!(counter.record_frame(frame), None);
    }

    #[test]
    fn placeholders_keep_sprites_apart() {
        for (index, key) in SpriteKey::ALL.into_iter().enumerate() {
            for other in &SpriteKey::ALL[index + 1..] {
                assert_ne!(placeholder_color(key), placeholder_color(*other));
            }
        }
    }
}
