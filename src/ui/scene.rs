//! Arena scene
//!
//! Colored rectangles for platforms, fighters and attack swings, kept in sync
//! with the `Duel` every frame. World coordinates are y-down with the origin
//! at the arena's top-left corner; bevy's 2D space is y-up and centered.

use bevy::prelude::*;

use crate::duel::{attack_hitbox, Duel, FighterId, ARENA_WIDTH, FIGHTER_HEIGHT, FIGHTER_WIDTH, FLOOR_Y};

use super::colors;

/// Center of a world-space rectangle in bevy coordinates.
pub fn world_to_screen(x: f32, y: f32, width: f32, height: f32) -> Vec3 {
    Vec3::new(
        x - ARENA_WIDTH / 2.0 + width / 2.0,
        FLOOR_Y / 2.0 - y - height / 2.0,
        0.0,
    )
}

#[derive(Component)]
pub struct FighterSprite(pub FighterId);

/// The hitbox preview shown while a fighter's attack is active
#[derive(Component)]
pub struct AttackSwing(pub FighterId);

pub fn setup_scene(mut commands: Commands, duel: Res<Duel>) {
    for platform in duel.arena().platforms() {
        commands.spawn((
            Sprite::from_color(colors::PLATFORM, Vec2::new(platform.width, platform.height)),
            Transform::from_translation(world_to_screen(
                platform.x,
                platform.y,
                platform.width,
                platform.height,
            )),
        ));
    }

    for fighter in duel.fighters() {
        commands.spawn((
            Sprite::from_color(
                colors::fighter(fighter.id),
                Vec2::new(FIGHTER_WIDTH, FIGHTER_HEIGHT),
            ),
            Transform::from_translation(
                world_to_screen(fighter.x, fighter.y, FIGHTER_WIDTH, FIGHTER_HEIGHT).with_z(2.0),
            ),
            FighterSprite(fighter.id),
        ));

        let swing = attack_hitbox(&fighter.view());
        commands.spawn((
            Sprite::from_color(colors::SWING, Vec2::new(swing.width, swing.height)),
            Transform::from_translation(
                world_to_screen(swing.x, swing.y, swing.width, swing.height).with_z(1.0),
            ),
            Visibility::Hidden,
            AttackSwing(fighter.id),
        ));
    }
}

/// Move fighter rectangles and tint them by combat state.
pub fn sync_fighter_sprites(
    duel: Res<Duel>,
    mut fighters: Query<(&FighterSprite, &mut Transform, &mut Sprite)>,
    mut swings: Query<(&AttackSwing, &mut Transform, &mut Visibility), Without<FighterSprite>>,
) {
    let now = duel.now_ms();

    for (marker, mut transform, mut sprite) in &mut fighters {
        let fighter = duel.fighter(marker.0);
        transform.translation =
            world_to_screen(fighter.x, fighter.y, FIGHTER_WIDTH, FIGHTER_HEIGHT).with_z(2.0);
        sprite.color = if fighter.is_stunned(now) {
            colors::STUNNED
        } else if fighter.is_blocking {
            colors::fighter_blocking(fighter.id)
        } else {
            colors::fighter(fighter.id)
        };
    }

    for (marker, mut transform, mut visibility) in &mut swings {
        let fighter = duel.fighter(marker.0);
        let swing = attack_hitbox(&fighter.view());
        transform.translation =
            world_to_screen(swing.x, swing.y, swing.width, swing.height).with_z(1.0);
        *visibility = if fighter.is_attacking {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_platform_maps_to_bottom_of_view() {
        let ground = world_to_screen(0.0, 550.0, 800.0, 50.0);
        assert_eq!(ground.x, 0.0);
        assert_eq!(ground.y, -275.0);
    }

    #[test]
    fn test_top_left_corner_maps_to_top_left() {
        let corner = world_to_screen(0.0, 0.0, 0.0, 0.0);
        assert_eq!(corner.truncate(), Vec2::new(-400.0, 300.0));
    }
}
