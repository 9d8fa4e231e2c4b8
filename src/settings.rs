//! Game settings and configuration
//!
//! User preferences stored in `settings.ron`: vsync, keybindings, who plays
//! the second fighter, and the match rules for new matches.

use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::duel::{ArenaMap, ControlScheme, MatchRules, DEFAULT_BEST_OF, ROUND_DURATION_SECS};
use crate::keybindings::Keybindings;

/// User-configurable game settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub vsync: bool,
    pub keybindings: Keybindings,
    /// Let the computer play the second fighter
    pub player_two_computer: bool,
    pub best_of: u32,
    pub round_duration_secs: f32,
    pub map: ArenaMap,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            keybindings: Keybindings::default(),
            player_two_computer: true,
            best_of: DEFAULT_BEST_OF,
            round_duration_secs: ROUND_DURATION_SECS,
            map: ArenaMap::default(),
        }
    }
}

impl GameSettings {
    /// Get the path to the settings file
    fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load settings from `settings.ron`, or return defaults
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from a file, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        let settings = match fs::read_to_string(path) {
            Ok(contents) => match ron::from_str::<GameSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}", e);
                Self::default()
            }
        };
        settings.sanitized()
    }

    /// Replace out-of-range match rules with defaults
    fn sanitized(mut self) -> Self {
        if self.best_of == 0 {
            warn!("best_of must be at least 1, using {}", DEFAULT_BEST_OF);
            self.best_of = DEFAULT_BEST_OF;
        }
        if !self.round_duration_secs.is_finite() || self.round_duration_secs <= 0.0 {
            warn!(
                "round_duration_secs must be positive, using {}",
                ROUND_DURATION_SECS
            );
            self.round_duration_secs = ROUND_DURATION_SECS;
        }
        self
    }

    /// Save settings to `settings.ron`
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, contents)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules {
            best_of: self.best_of,
            round_duration_secs: self.round_duration_secs,
        }
    }

    /// Control schemes for p1 and p2
    pub fn control_schemes(&self) -> [ControlScheme; 2] {
        let p2 = if self.player_two_computer {
            ControlScheme::Computer
        } else {
            ControlScheme::Secondary
        };
        [ControlScheme::Primary, p2]
    }

    pub fn present_mode(&self) -> PresentMode {
        if self.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        }
    }
}

/// Plugin for managing game settings
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<GameSettings>()
            .cloned()
            .unwrap_or_else(GameSettings::load);

        // Keybindings as a separate resource for easy access
        let keybindings = settings.keybindings.clone();

        app.insert_resource(settings)
            .insert_resource(keybindings)
            .add_systems(Update, (save_settings_on_change, apply_runtime_settings, sync_keybindings));
    }
}

/// System to save settings when they change
fn save_settings_on_change(settings: Res<GameSettings>) {
    if settings.is_changed() && !settings.is_added() {
        if let Err(e) = settings.save() {
            error!("Failed to save settings: {}", e);
        }
    }
}

/// System to apply settings that can be changed at runtime
fn apply_runtime_settings(
    settings: Res<GameSettings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if settings.is_changed() && !settings.is_added() {
        if let Ok(mut window) = windows.get_single_mut() {
            window.present_mode = settings.present_mode();
            info!("Applied VSync: {}", settings.vsync);
        }
    }
}

/// System to keep Keybindings resource in sync with GameSettings
fn sync_keybindings(settings: Res<GameSettings>, mut keybindings: ResMut<Keybindings>) {
    if settings.is_changed() && !settings.is_added() {
        *keybindings = settings.keybindings.clone();
        info!("Synced keybindings from settings");
    }
}
