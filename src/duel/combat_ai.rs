//! Computer opponent
//!
//! Controllers turn read-only views of both fighters into an `InputIntent`.
//! They never touch fighter state; the tick driver feeds the intent straight
//! into the same tick's update.

use super::constants::*;
use super::fighter::{FighterView, InputIntent};

/// Anything that can drive a fighter in place of a keyboard.
pub trait IntentSource: Send + Sync {
    fn name(&self) -> &str;
    fn decide(&mut self, me: &FighterView, opponent: &FighterView, now: f32) -> InputIntent;
}

/// Controller that never presses anything - useful for testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleController;

impl IntentSource for IdleController {
    fn name(&self) -> &str {
        "idle"
    }

    fn decide(&mut self, _me: &FighterView, _opponent: &FighterView, _now: f32) -> InputIntent {
        InputIntent::NONE
    }
}

/// Reactive melee opponent.
///
/// Rules, in priority order:
/// 1. Stunned: do nothing.
/// 2. Opponent swinging close by while grounded: block and nothing else.
/// 3. Keep the center distance inside the melee band.
/// 4. Jump after an opponent standing clearly higher.
/// 5. Swing when close enough horizontally and vertically.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReactiveAi;

impl IntentSource for ReactiveAi {
    fn name(&self) -> &str {
        "reactive"
    }

    fn decide(&mut self, me: &FighterView, opponent: &FighterView, now: f32) -> InputIntent {
        let mut intent = InputIntent::NONE;

        if me.is_stunned(now) {
            return intent;
        }

        let (my_x, my_y) = me.center();
        let (their_x, their_y) = opponent.center();
        let dx = their_x - my_x;
        let abs_dx = dx.abs();
        // Positive when the opponent is higher up the screen
        let height_diff = my_y - their_y;

        if opponent.is_attacking && abs_dx < AI_BLOCK_DISTANCE && me.on_ground {
            intent.block = true;
            return intent;
        }

        let toward_right = dx > 0.0;
        if abs_dx > AI_DESIRED_RANGE + AI_RANGE_TOLERANCE {
            intent.move_right = toward_right;
            intent.move_left = !toward_right;
        } else if abs_dx < AI_DESIRED_RANGE - AI_RANGE_TOLERANCE {
            intent.move_right = !toward_right;
            intent.move_left = toward_right;
        }

        if me.on_ground && height_diff > AI_JUMP_HEIGHT_DIFF {
            intent.jump = true;
        }

        if abs_dx < AI_ATTACK_DISTANCE
            && height_diff.abs() < MAX_VERTICAL_HIT_DISTANCE
            && me.can_attack(now)
        {
            intent.attack = true;
        }

        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::fighter::{ControlScheme, Fighter, FighterId};

    fn views(my_x: f32, their_x: f32) -> (Fighter, Fighter) {
        let mut me = Fighter::new(FighterId::P2, ControlScheme::Computer);
        let mut them = Fighter::new(FighterId::P1, ControlScheme::Primary);
        for (fighter, x) in [(&mut me, my_x), (&mut them, their_x)] {
            fighter.x = x;
            fighter.y = 500.0;
            fighter.on_ground = true;
        }
        (me, them)
    }

    #[test]
    fn test_approaches_from_afar() {
        let (me, them) = views(600.0, 200.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 0.0);
        assert!(intent.move_left);
        assert!(!intent.move_right);
        assert!(!intent.attack);
    }

    #[test]
    fn test_backs_off_when_too_close() {
        let (me, them) = views(210.0, 200.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 0.0);
        assert!(intent.move_right, "opponent is to the left, so retreat right");
        assert!(!intent.move_left);
    }

    #[test]
    fn test_holds_and_swings_inside_band() {
        let (me, them) = views(240.0, 200.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 0.0);
        assert!(!intent.move_left && !intent.move_right);
        assert!(intent.attack);
    }

    #[test]
    fn test_blocks_incoming_attack() {
        let (me, mut them) = views(240.0, 200.0);
        them.start_attack(0.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 10.0);
        assert_eq!(
            intent,
            InputIntent {
                block: true,
                ..InputIntent::NONE
            }
        );
    }

    #[test]
    fn test_does_not_block_in_the_air() {
        let (mut me, mut them) = views(240.0, 200.0);
        me.on_ground = false;
        them.start_attack(0.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 10.0);
        assert!(!intent.block);
    }

    #[test]
    fn test_jumps_toward_higher_opponent() {
        let (me, mut them) = views(600.0, 200.0);
        them.y = 400.0;
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 0.0);
        assert!(intent.jump);
        assert!(intent.move_left);
    }

    #[test]
    fn test_stunned_does_nothing() {
        let (mut me, them) = views(240.0, 200.0);
        me.apply_stun(100.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), 50.0);
        assert!(intent.is_idle());
    }

    #[test]
    fn test_respects_cooldown() {
        let (mut me, them) = views(240.0, 200.0);
        me.start_attack(0.0);
        let intent = ReactiveAi.decide(&me.view(), &them.view(), ATTACK_COOLDOWN_MS);
        assert!(!intent.attack);
    }

    #[test]
    fn test_idle_controller_never_acts() {
        let (me, them) = views(240.0, 200.0);
        assert!(IdleController.decide(&me.view(), &them.view(), 0.0).is_idle());
    }
}
