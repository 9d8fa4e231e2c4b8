//! HUD Rendering Systems
//!
//! Health bars, round clock and score, plus the pause, round-over and
//! match-over overlays. All presentation text is produced here from the
//! duel's status and round outcomes.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::duel::systems::RoundIntermission;
use crate::duel::{ControlScheme, Duel, FighterId, MatchPhase, RoundEndReason, RoundOutcome};
use crate::keybindings::{FighterAction, GameAction, Keybindings};

use super::{colors, fonts};

const HEALTH_BAR_WIDTH: f32 = 260.0;
/// Health fraction below which the bar turns red
const LOW_HP_THRESHOLD: f32 = 0.3;

// ==============================================================================
// Text
// ==============================================================================

pub fn reason_label(reason: RoundEndReason) -> &'static str {
    match reason {
        RoundEndReason::Knockout => "K.O.",
        RoundEndReason::DoubleKnockout => "Double K.O.",
        RoundEndReason::TimeUp => "Time",
    }
}

/// Headline for the round-over overlay
pub fn round_banner(outcome: &RoundOutcome) -> String {
    match outcome.winner {
        Some(winner) => format!("{} wins round {}!", winner.name(), outcome.round),
        None => format!("Round {} is a draw", outcome.round),
    }
}

/// Headline for the match-over overlay
pub fn match_banner(winner: FighterId) -> String {
    format!("{} wins the match!", winner.name())
}

/// Whole seconds shown on the round clock
pub fn clock_text(time_remaining_secs: f32) -> String {
    format!("{}", time_remaining_secs.max(0.0).ceil() as u32)
}

// ==============================================================================
// HUD
// ==============================================================================

fn health_bar(ui: &mut egui::Ui, id: FighterId, health: u32, max_health: u32, wins: u32) {
    let fraction = health as f32 / max_health.max(1) as f32;
    let fill = if fraction < LOW_HP_THRESHOLD {
        colors::egui_low_health()
    } else {
        colors::egui_fighter(id)
    };

    ui.vertical(|ui| {
        ui.label(
            egui::RichText::new(format!("{}  {}", id.name(), "★".repeat(wins as usize)))
                .size(fonts::BODY)
                .color(egui::Color32::from_rgb(230, 230, 230))
                .strong(),
        );
        ui.add(
            egui::ProgressBar::new(fraction)
                .desired_width(HEALTH_BAR_WIDTH)
                .fill(fill)
                .text(format!("{} / {}", health, max_health)),
        );
    });
}

/// Top bar: both health bars with the clock and round between them.
pub fn render_hud(mut contexts: EguiContexts, duel: Res<Duel>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let status = duel.status();
    let p1 = duel.fighter(FighterId::P1);
    let p2 = duel.fighter(FighterId::P2);

    egui::TopBottomPanel::top("duel_hud")
        .frame(
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(160))
                .inner_margin(egui::Margin::symmetric(12.0, 8.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                health_bar(ui, FighterId::P1, status.health[0], p1.max_health, status.wins[0]);

                let center_width = ui.available_width() - HEALTH_BAR_WIDTH;
                ui.allocate_ui(egui::vec2(center_width.max(80.0), 48.0), |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(clock_text(status.time_remaining_secs))
                                .size(fonts::HEADER)
                                .color(egui::Color32::from_rgb(255, 215, 0))
                                .strong(),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "Round {}  ·  Best of {}",
                                status.round,
                                duel.state().rules().best_of
                            ))
                            .size(fonts::SMALL)
                            .color(egui::Color32::from_rgb(200, 200, 200)),
                        );
                    });
                });

                health_bar(ui, FighterId::P2, status.health[1], p2.max_health, status.wins[1]);
            });
        });
}

/// Control reminder in the bottom-left corner
pub fn render_controls_help(
    mut contexts: EguiContexts,
    duel: Res<Duel>,
    keybindings: Res<Keybindings>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let screen_height = ctx.screen_rect().height();

    egui::Area::new(egui::Id::new("controls_help"))
        .fixed_pos(egui::pos2(10.0, screen_height - 70.0))
        .show(ctx, |ui| {
            for id in [FighterId::P1, FighterId::P2] {
                let scheme = duel.fighter(id).control;
                let line = if scheme == ControlScheme::Computer {
                    format!("{}: computer", id.name())
                } else {
                    FighterAction::all()
                        .iter()
                        .map(|action| {
                            format!(
                                "{} {}",
                                action.description(),
                                keybindings.fighter_binding_display(scheme, *action)
                            )
                        })
                        .fold(format!("{}:", id.name()), |line, part| line + "  " + &part)
                };
                ui.label(
                    egui::RichText::new(line)
                        .size(fonts::SMALL)
                        .color(egui::Color32::from_rgb(170, 170, 170)),
                );
            }
            ui.label(
                egui::RichText::new(
                    GameAction::all()
                        .iter()
                        .map(|action| {
                            format!(
                                "{} {}",
                                action.description(),
                                keybindings.binding_display(*action)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("  "),
                )
                .size(fonts::SMALL)
                .color(egui::Color32::from_rgb(170, 170, 170)),
            );
        });
}

// ==============================================================================
// Overlays
// ==============================================================================

fn paint_banner(ctx: &egui::Context, id: &'static str, title: &str, lines: &[String]) {
    let center = ctx.screen_rect().center();
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new(id)));

    painter.rect_filled(
        egui::Rect::from_center_size(center, egui::vec2(520.0, 180.0)),
        8.0,
        egui::Color32::from_black_alpha(190),
    );
    painter.text(
        egui::pos2(center.x, center.y - 40.0),
        egui::Align2::CENTER_CENTER,
        title,
        egui::FontId::proportional(fonts::TITLE),
        egui::Color32::from_rgb(255, 215, 0),
    );
    for (i, line) in lines.iter().enumerate() {
        painter.text(
            egui::pos2(center.x, center.y + 15.0 + i as f32 * 26.0),
            egui::Align2::CENTER_CENTER,
            line,
            egui::FontId::proportional(fonts::BODY),
            egui::Color32::from_rgb(220, 220, 220),
        );
    }
}

/// Pause, round-over and match-over banners
pub fn render_overlays(
    mut contexts: EguiContexts,
    duel: Res<Duel>,
    intermission: Res<RoundIntermission>,
    keybindings: Res<Keybindings>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    match duel.phase() {
        MatchPhase::Playing => {}
        MatchPhase::Paused => paint_banner(
            ctx,
            "pause_overlay",
            "PAUSED",
            &[format!(
                "Press {} to resume",
                keybindings.binding_display(GameAction::PausePlay)
            )],
        ),
        MatchPhase::RoundOver => {
            let Some(outcome) = duel.state().last_outcome() else {
                return;
            };
            let mut lines = vec![format!(
                "{}  ·  {} - {}",
                reason_label(outcome.reason),
                duel.state().wins(FighterId::P1),
                duel.state().wins(FighterId::P2)
            )];
            if let Some(remaining) = intermission.remaining() {
                lines.push(format!("Next round in {}", remaining.ceil().max(1.0) as u32));
            }
            paint_banner(ctx, "round_overlay", &round_banner(outcome), &lines);
        }
        MatchPhase::MatchOver => {
            let title = duel
                .state()
                .match_winner()
                .map(match_banner)
                .unwrap_or_else(|| "Match over".to_string());
            paint_banner(
                ctx,
                "match_overlay",
                &title,
                &[format!(
                    "Press {} for a new match",
                    keybindings.binding_display(GameAction::NewMatch)
                )],
            );
        }
    }
}
