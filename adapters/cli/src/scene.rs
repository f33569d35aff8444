//! Translates the screen machine into a renderable scene.

use cowboy_shooter_core::{PickupKind, Playfield, Rect, TICKS_PER_SECOND, WINDOW_TITLE};
use cowboy_shooter_rendering::{
    Color, PlayerStatus, Scene, SceneButton, SceneProjectile, SceneSprite, SceneText, SpriteKey,
};
use cowboy_shooter_system_notifications::{Notification, Tone};
use cowboy_shooter_system_screens::{Screen, ScreenMachine, Session};
use cowboy_shooter_world::{entities::Movable, query};
use glam::Vec2;

/// Sky blue used to clear every frame.
pub(crate) const SKY: Color = Color::from_rgb_u8(135, 206, 235);

const INK: Color = Color::from_rgb_u8(0, 0, 0);
const WHITE: Color = Color::from_rgb_u8(255, 255, 255);
const BOOST_ACTIVE: Color = Color::from_rgb_u8(0, 160, 0);
const GAME_OVER_RED: Color = Color::from_rgb_u8(255, 0, 0);
const HUD_FONT_SIZE: f32 = 24.0;
const TITLE_FONT_SIZE: f32 = 48.0;
const NOTIFICATION_FONT_SIZE: f32 = 20.0;
const HUD_LEFT: f32 = 10.0;
const HUD_LINE_HEIGHT: f32 = 25.0;
const HEART_ROW: f32 = 85.0;
const HEART_SPACING: f32 = 45.0;

/// Rebuilds `scene` from the machine's active screen.
pub(crate) fn populate(scene: &mut Scene, machine: &ScreenMachine) {
    scene.clear();
    let playfield = scene.playfield;
    let session = machine.session();

    match machine.screen() {
        Screen::Menu => push_menu(scene, &playfield),
        Screen::Playing => push_session(scene, session),
        Screen::Paused => {
            push_session(scene, session);
            scene.dim = Some(Color::from_rgb_u8(50, 50, 50).with_alpha(0.5));
            push_title(scene, &playfield, "Paused", WHITE);
        }
        Screen::GameOver => {
            push_session(scene, session);
            scene.dim = Some(Color::from_rgb_u8(50, 50, 50).with_alpha(200.0 / 255.0));
            push_title(scene, &playfield, "Game Over", GAME_OVER_RED);
            scene.texts.push(
                SceneText::new(
                    format!("Final Score: {}", session.score()),
                    centre(&playfield),
                    HUD_FONT_SIZE,
                    WHITE,
                )
                .centered(),
            );
        }
    }

    scene
        .buttons
        .extend(machine.buttons().iter().map(|button| SceneButton {
            label: button.label().to_owned(),
            bounds: button.bounds(),
        }));
}

fn centre(playfield: &Playfield) -> Vec2 {
    Vec2::new(playfield.width(), playfield.height()) / 2.0
}

fn push_title(scene: &mut Scene, playfield: &Playfield, title: &str, color: Color) {
    let position = centre(playfield) - Vec2::new(0.0, 60.0);
    scene
        .texts
        .push(SceneText::new(title, position, TITLE_FONT_SIZE, color).centered());
}

fn push_menu(scene: &mut Scene, playfield: &Playfield) {
    push_title(scene, playfield, WINDOW_TITLE, INK);
    scene.texts.push(
        SceneText::new(
            "Arrows or WASD move, Space fires, P pauses, Z undoes",
            centre(playfield) + Vec2::new(0.0, 80.0),
            NOTIFICATION_FONT_SIZE,
            INK,
        )
        .centered(),
    );
}

fn push_session(scene: &mut Scene, session: &Session) {
    let world = session.world();
    let player = query::player(world);

    scene.sprites.push(SceneSprite::player(
        player.bounds(),
        PlayerStatus {
            boost_active: player.boost_active(),
        },
    ));
    scene.sprites.extend(
        query::enemies(world)
            .iter()
            .map(|enemy| SceneSprite::new(SpriteKey::for_enemy(enemy.kind()), enemy.bounds())),
    );
    scene.sprites.extend(
        query::pickups(world)
            .iter()
            .map(|pickup| SceneSprite::new(SpriteKey::for_pickup(pickup.kind()), pickup.bounds())),
    );
    scene.projectiles.extend(
        query::player_projectiles(world)
            .iter()
            .chain(query::enemy_projectiles(world))
            .map(|projectile| SceneProjectile {
                kind: projectile.kind(),
                bounds: projectile.bounds(),
            }),
    );

    let hud_line = |row: u8| Vec2::new(HUD_LEFT, HUD_LINE_HEIGHT * f32::from(row));
    scene.texts.push(SceneText::new(
        format!("Score: {}", session.score()),
        hud_line(1),
        HUD_FONT_SIZE,
        INK,
    ));
    scene.texts.push(SceneText::new(
        format!("Time: {}", query::elapsed_seconds(world).floor()),
        hud_line(2),
        HUD_FONT_SIZE,
        INK,
    ));
    let boost_seconds = u64::from(player.boost_remaining()) / TICKS_PER_SECOND;
    scene.texts.push(SceneText::new(
        format!("Boost: {boost_seconds}"),
        hud_line(3),
        HUD_FONT_SIZE,
        if player.boost_active() {
            BOOST_ACTIVE
        } else {
            INK
        },
    ));

    let heart_size = PickupKind::Heal.size();
    let heart_x = |slot: u32| HUD_LEFT + slot as f32 * HEART_SPACING;
    scene.hud_icons.extend((0..player.health()).map(|index| {
        SceneSprite::new(
            SpriteKey::Heal,
            Rect::new(Vec2::new(heart_x(index), HEART_ROW), heart_size),
        )
    }));
    scene.texts.push(SceneText::new(
        format!("{}/{}", player.health(), player.max_health()),
        Vec2::new(heart_x(player.max_health()), HEART_ROW + heart_size.y),
        HUD_FONT_SIZE,
        INK,
    ));

    let below_hearts = HEART_ROW + heart_size.y + HUD_LINE_HEIGHT;
    scene.texts.push(SceneText::new(
        format!("Drop: {:.0}%", query::drop_chance(world) * 100.0),
        Vec2::new(HUD_LEFT, below_hearts),
        HUD_FONT_SIZE,
        INK,
    ));
    if let Some(wave) = query::active_wave(world) {
        let spawned = query::waves(world)
            .get(wave)
            .map_or(0, |group| group.spawned());
        scene.texts.push(SceneText::new(
            format!("Wave: {} ({spawned} spawned)", wave + 1),
            Vec2::new(HUD_LEFT, below_hearts + HUD_LINE_HEIGHT),
            HUD_FONT_SIZE,
            INK,
        ));
    }

    scene.texts.extend(
        session
            .notifications()
            .active()
            .iter()
            .map(notification_text),
    );
}

fn notification_text(notification: &Notification) -> SceneText {
    let color = match notification.tone() {
        Tone::Reward => Color::from_rgb_u8(0, 140, 0),
        Tone::Warning => Color::from_rgb_u8(200, 0, 0),
        Tone::Info => Color::from_rgb_u8(20, 20, 120),
    };
    SceneText::new(
        notification.text(),
        notification.position(),
        NOTIFICATION_FONT_SIZE,
        color.with_alpha(notification.opacity()),
    )
    .centered()
}
