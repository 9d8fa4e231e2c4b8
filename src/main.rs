//! Duelsim - Two-Fighter Platform Arena Combat
//!
//! Windowed by default; `--headless <config.json>` runs a computer-driven
//! match without graphics and saves its combat log.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use duelsim::camera::CameraPlugin;
use duelsim::cli;
use duelsim::combat::CombatPlugin;
use duelsim::duel::systems::DuelPlugin;
use duelsim::duel::{ARENA_WIDTH, FLOOR_Y};
use duelsim::headless::{run_headless_match, HeadlessMatchConfig};
use duelsim::settings::{GameSettings, SettingsPlugin};
use duelsim::ui::{colors, UiPlugin};

fn main() {
    let args = cli::parse_args();

    if let Some(config_path) = args.headless {
        let mut config = match HeadlessMatchConfig::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        if let Some(output) = args.output {
            config.output_path = Some(output.display().to_string());
        }
        if let Some(max_duration) = args.max_duration {
            config.max_duration_secs = max_duration;
        }

        if let Err(e) = run_headless_match(config) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let settings = GameSettings::load();

    App::new()
        // Bevy default plugins with custom window settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Duelsim".to_string(),
                resolution: (ARENA_WIDTH, FLOOR_Y).into(),
                resizable: false,
                present_mode: settings.present_mode(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(colors::BACKGROUND))
        .insert_resource(settings)
        // Our game plugins
        .add_plugins((
            EguiPlugin,
            SettingsPlugin,
            DuelPlugin,
            CombatPlugin,
            CameraPlugin,
            UiPlugin,
        ))
        .run();
}
