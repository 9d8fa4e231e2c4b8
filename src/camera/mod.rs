//! Camera system
//!
//! A fixed 2D camera framing the whole arena, with a short screen shake on
//! every connected hit.

use bevy::prelude::*;

use crate::combat::events::FighterHitEvent;
use crate::ui::effects::GameRng;

/// Plugin for camera management
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraShake>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (start_shake_on_hit, apply_camera_shake).chain());
    }
}

/// Marker component for the main 2D game camera
#[derive(Component)]
pub struct MainCamera;

/// Screen shake state
#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    /// Seconds of shake left
    pub remaining: f32,
    /// Maximum offset in pixels
    pub intensity: f32,
}

impl CameraShake {
    pub const DURATION_SECS: f32 = 0.18;
    pub const INTENSITY: f32 = 6.0;
    /// Intensity kept per frame at 60 fps
    pub const DECAY: f32 = 0.92;

    pub fn trigger(&mut self) {
        self.remaining = Self::DURATION_SECS;
        self.intensity = Self::INTENSITY;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Run the shake forward and return this frame's maximum offset.
    pub fn advance(&mut self, dt_secs: f32) -> f32 {
        let intensity = self.intensity;
        self.remaining -= dt_secs;
        self.intensity *= Self::DECAY.powf(dt_secs * 60.0);
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.intensity = 0.0;
        }
        intensity
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MainCamera, Transform::default()));
}

fn start_shake_on_hit(mut hits: EventReader<FighterHitEvent>, mut shake: ResMut<CameraShake>) {
    if hits.read().count() > 0 {
        shake.trigger();
    }
}

/// Jitter the camera around the origin while a shake is running
fn apply_camera_shake(
    time: Res<Time>,
    mut shake: ResMut<CameraShake>,
    mut rng: ResMut<GameRng>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = cameras.get_single_mut() else {
        return;
    };

    if !shake.is_active() {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
        return;
    }

    let half = shake.advance(time.delta_secs()) / 2.0;
    transform.translation.x = rng.random_range(-half, half);
    transform.translation.y = rng.random_range(-half, half);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_starts_shake() {
        let mut shake = CameraShake::default();
        assert!(!shake.is_active());
        shake.trigger();
        assert!(shake.is_active());
        assert_eq!(shake.intensity, CameraShake::INTENSITY);
    }

    #[test]
    fn test_shake_decays_then_stops() {
        let mut shake = CameraShake::default();
        shake.trigger();

        let first = shake.advance(1.0 / 60.0);
        assert_eq!(first, CameraShake::INTENSITY);
        assert!((shake.intensity - CameraShake::INTENSITY * CameraShake::DECAY).abs() < 1e-4);

        let second = shake.advance(1.0 / 60.0);
        assert!(second < first);

        for _ in 0..20 {
            shake.advance(1.0 / 60.0);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.intensity, 0.0);
    }
}
