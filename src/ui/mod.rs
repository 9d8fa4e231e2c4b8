//! UI System
//!
//! Everything the player sees in windowed mode:
//! - Arena scene (platforms, fighters, attack swings)
//! - Particle effects for hits, landings and running
//! - egui HUD and round/match overlays

use bevy::prelude::*;

pub mod effects;
pub mod hud;
pub mod scene;

use crate::duel::systems::DuelSystemPhase;

/// Plugin for UI management. Requires the `Duel` resource and `EguiPlugin`.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<effects::GameRng>()
            .init_resource::<effects::ParticleCounter>()
            .init_resource::<effects::RunDust>()
            .add_systems(Startup, scene::setup_scene)
            .add_systems(
                Update,
                (
                    scene::sync_fighter_sprites,
                    effects::spawn_hit_sparks,
                    effects::spawn_landing_dust,
                    effects::spawn_run_dust,
                    effects::cap_particles,
                    effects::update_particles,
                )
                    .chain()
                    .after(DuelSystemPhase::Simulation),
            )
            .add_systems(
                Update,
                (hud::render_hud, hud::render_overlays, hud::render_controls_help),
            );
    }
}

/// Common colors used throughout the UI
pub mod colors {
    use bevy::prelude::*;
    use bevy_egui::egui;

    use crate::duel::FighterId;

    /// Player 1 color (blue-ish)
    pub const P1: Color = Color::srgb(0.2, 0.4, 0.8);
    /// Player 2 color (red-ish)
    pub const P2: Color = Color::srgb(0.8, 0.2, 0.2);
    pub const P1_BLOCKING: Color = Color::srgb(0.5, 0.7, 1.0);
    pub const P2_BLOCKING: Color = Color::srgb(1.0, 0.55, 0.55);
    /// Flash while stunned
    pub const STUNNED: Color = Color::srgb(0.95, 0.95, 0.95);
    pub const SWING: Color = Color::srgba(1.0, 0.9, 0.3, 0.35);
    pub const PLATFORM: Color = Color::srgb(0.35, 0.3, 0.25);
    pub const BACKGROUND: Color = Color::srgb(0.53, 0.75, 0.92);
    pub const BLOCK_SPARK: Color = Color::srgb(0.7, 0.9, 1.0);
    pub const DUST: Color = Color::srgba(0.8, 0.8, 0.8, 0.9);
    pub const RUN_DUST: Color = Color::srgba(0.7, 0.7, 0.7, 0.8);

    pub fn fighter(id: FighterId) -> Color {
        match id {
            FighterId::P1 => P1,
            FighterId::P2 => P2,
        }
    }

    pub fn fighter_blocking(id: FighterId) -> Color {
        match id {
            FighterId::P1 => P1_BLOCKING,
            FighterId::P2 => P2_BLOCKING,
        }
    }

    pub fn egui_fighter(id: FighterId) -> egui::Color32 {
        match id {
            FighterId::P1 => egui::Color32::from_rgb(51, 102, 204),
            FighterId::P2 => egui::Color32::from_rgb(204, 51, 51),
        }
    }

    pub fn egui_low_health() -> egui::Color32 {
        egui::Color32::from_rgb(230, 60, 40)
    }
}

/// Font sizes used throughout the UI
pub mod fonts {
    /// Large title text
    pub const TITLE: f32 = 40.0;
    /// Section headers
    pub const HEADER: f32 = 28.0;
    /// Normal body text
    pub const BODY: f32 = 18.0;
    /// Small labels and annotations
    pub const SMALL: f32 = 13.0;
}
