//! Per-tick interaction resolution between the player, enemies, projectiles and pickups.
//!
//! Every pass moves the collection it inspects out of the world, evaluates each
//! element exactly once and rebuilds the collection from the survivors, so
//! removals triggered mid-pass never skip or repeat a sibling.

use std::mem;

use cowboy_shooter_core::{Event, PickupKind, ProjectileKind, SCORE_PER_KILL};
use rand::Rng;

use crate::{
    drop_chance,
    entities::{Collectible, Damageable, Enemy, Movable, Pickup, Projectile},
    World,
};

const CONTACT_DAMAGE: u32 = 1;
const PROJECTILE_DAMAGE: u32 = 1;

/// Resolves every interaction for the current tick in a fixed order.
pub(crate) fn resolve(world: &mut World, out_events: &mut Vec<Event>) {
    resolve_player_fire(world, out_events);
    resolve_enemies(world, out_events);
    resolve_enemy_fire(world, out_events);
    resolve_pickups(world, out_events);
}

fn resolve_player_fire(world: &mut World, out_events: &mut Vec<Event>) {
    let bullets = mem::take(&mut world.player_projectiles);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        if !world.playfield.contains(&bullet.bounds()) {
            continue;
        }

        let target = world
            .enemies
            .iter()
            .position(|enemy| enemy.bounds().overlaps(&bullet.bounds()));
        let Some(index) = target else {
            survivors.push(bullet);
            continue;
        };

        let damage = PROJECTILE_DAMAGE * world.player.damage_boost();
        let enemy = &mut world.enemies[index];
        let remaining = enemy.take_damage(damage);
        if !enemy.is_destroyed() {
            out_events.push(Event::EnemyDamaged {
                enemy: enemy.id(),
                remaining,
            });
            continue;
        }

        let enemy = world.enemies.remove(index);
        out_events.push(Event::EnemyDestroyed {
            enemy: enemy.id(),
            kind: enemy.kind(),
            position: enemy.position(),
        });
        out_events.push(Event::ScoreIncreased {
            points: SCORE_PER_KILL,
            position: enemy.bounds().center(),
        });
        roll_drop(world, &enemy, out_events);
    }

    world.player_projectiles = survivors;
}

fn roll_drop(world: &mut World, enemy: &Enemy, out_events: &mut Vec<Event>) {
    let chance = drop_chance(world.tick_index);
    let pickup = if world.rng.gen_bool(chance) {
        Some(if world.rng.gen_bool(0.5) {
            PickupKind::SpeedBooster
        } else {
            PickupKind::Heal
        })
    } else {
        None
    };
    out_events.push(Event::DropRolled {
        enemy: enemy.id(),
        pickup,
    });

    let Some(kind) = pickup else {
        return;
    };
    let id = world.allocate_id();
    let position = enemy.position();
    log::debug!("{kind:?} dropped at ({:.0}, {:.0})", position.x, position.y);
    world.pickups.push(Pickup::new(id, kind, position));
    out_events.push(Event::PickupDropped {
        pickup: id,
        kind,
        position,
    });
}

fn resolve_enemies(world: &mut World, out_events: &mut Vec<Event>) {
    let enemies = mem::take(&mut world.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());

    for mut enemy in enemies {
        if enemy.reload(&mut world.rng) {
            let id = world.allocate_id();
            world
                .enemy_projectiles
                .push(Projectile::new(id, ProjectileKind::Enemy, enemy.muzzle()));
            out_events.push(Event::ProjectileFired {
                projectile: id,
                kind: ProjectileKind::Enemy,
            });
        }

        if !world.playfield.contains(&enemy.bounds()) {
            continue;
        }

        if enemy.bounds().overlaps(&world.player.bounds()) {
            world.player.apply_damage(CONTACT_DAMAGE, out_events);
            out_events.push(Event::EnemyCollided { enemy: enemy.id() });
            continue;
        }

        survivors.push(enemy);
    }

    world.enemies = survivors;
}

fn resolve_enemy_fire(world: &mut World, out_events: &mut Vec<Event>) {
    let bullets = mem::take(&mut world.enemy_projectiles);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        if !world.playfield.contains(&bullet.bounds()) {
            continue;
        }
        if bullet.bounds().overlaps(&world.player.bounds()) {
            world.player.apply_damage(PROJECTILE_DAMAGE, out_events);
            continue;
        }
        survivors.push(bullet);
    }

    world.enemy_projectiles = survivors;
}

fn resolve_pickups(world: &mut World, out_events: &mut Vec<Event>) {
    let pickups = mem::take(&mut world.pickups);
    let mut survivors = Vec::with_capacity(pickups.len());

    for pickup in pickups {
        if pickup.bounds().overlaps(&world.player.bounds()) {
            out_events.push(Event::PickupCollected {
                pickup: pickup.id(),
                kind: pickup.kind(),
            });
            world.player.collect(pickup.effect(), out_events);
            continue;
        }
        if pickup.is_grounded(&world.playfield) {
            continue;
        }
        survivors.push(pickup);
    }

    world.pickups = survivors;
}
