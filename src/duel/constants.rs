//! Duel Constants
//!
//! Centralized location for the numbers the fighters, the resolver and the
//! round clock are tuned with. Renderers assume the world constants, so they
//! are fixed rather than configurable.

// ============================================================================
// World
// ============================================================================

/// Width of the arena in pixels. Fighters are clamped to `[0, ARENA_WIDTH - FIGHTER_WIDTH]`.
pub const ARENA_WIDTH: f32 = 800.0;

/// Y coordinate of the world floor (y grows downward).
pub const FLOOR_Y: f32 = 600.0;

/// Distance within which a fighter standing on a platform top counts as resting on it.
pub const CONTACT_EPSILON: f32 = 0.5;

// ============================================================================
// Fighter Body & Movement
// ============================================================================

pub const FIGHTER_WIDTH: f32 = 30.0;
pub const FIGHTER_HEIGHT: f32 = 50.0;
pub const MAX_HEALTH: u32 = 100;

/// Horizontal run speed in px/s.
pub const MOVE_SPEED: f32 = 300.0;

/// Initial upward velocity of a jump in px/s.
pub const JUMP_POWER: f32 = 600.0;

/// Downward acceleration in px/s² (only applied while airborne).
pub const GRAVITY: f32 = 1500.0;

/// Run speed multiplier while holding block.
pub const BLOCK_SPEED_MULTIPLIER: f32 = 0.35;

/// Spawn positions (top-left of the fighter box).
pub const P1_SPAWN: (f32, f32) = (200.0, 500.0);
pub const P2_SPAWN: (f32, f32) = (600.0, 500.0);

// ============================================================================
// Attack Timing (milliseconds of simulation time)
// ============================================================================

/// Minimum time between two attacks. An attack is allowed only strictly after it elapses.
pub const ATTACK_COOLDOWN_MS: f32 = 500.0;

/// How long a started attack stays active.
pub const ATTACK_DURATION_MS: f32 = 200.0;

// ============================================================================
// Hit Resolution
// ============================================================================

/// Depth of the hitbox projected in front of the attacker.
pub const HITBOX_REACH: f32 = 50.0;

/// Extra hitbox height above and below the attacker's body.
pub const HITBOX_VERTICAL_PADDING: f32 = 10.0;

/// Hits only register when body centers are closer than this vertically.
pub const MAX_VERTICAL_HIT_DISTANCE: f32 = 60.0;

pub const BASE_DAMAGE: u32 = 15;

/// Fraction of the base damage a blocked hit still deals (rounded up).
pub const BLOCKED_DAMAGE_FACTOR: f32 = 0.3;

/// Knockback (horizontal, vertical) in px/s.
pub const KNOCKBACK: (f32, f32) = (220.0, 250.0);
pub const BLOCKED_KNOCKBACK: (f32, f32) = (120.0, 150.0);

/// Stun applied to the defender, in milliseconds.
pub const HIT_STUN_MS: f32 = 220.0;
pub const BLOCKED_STUN_MS: f32 = 120.0;

// ============================================================================
// Computer Opponent
// ============================================================================

/// Center distance the computer tries to keep from its opponent.
pub const AI_DESIRED_RANGE: f32 = 40.0;
pub const AI_RANGE_TOLERANCE: f32 = 10.0;

/// Horizontal distance at which an attacking opponent makes the computer block.
pub const AI_BLOCK_DISTANCE: f32 = 80.0;

/// The computer jumps when the opponent's center is this much higher.
pub const AI_JUMP_HEIGHT_DIFF: f32 = 40.0;

/// Horizontal distance under which the computer swings.
pub const AI_ATTACK_DISTANCE: f32 = 50.0;

// ============================================================================
// Rounds
// ============================================================================

/// Length of a round in seconds.
pub const ROUND_DURATION_SECS: f32 = 99.0;

/// Default number of rounds in a match (best of N).
pub const DEFAULT_BEST_OF: u32 = 3;

/// Pause between a round ending and the next one starting, in seconds.
pub const ROUND_INTERMISSION_SECS: f32 = 2.0;

/// Largest frame delta the tick driver accepts, in milliseconds.
pub const MAX_FRAME_MS: f32 = 100.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_values_are_weaker() {
        assert!(BLOCKED_KNOCKBACK.0 < KNOCKBACK.0);
        assert!(BLOCKED_KNOCKBACK.1 < KNOCKBACK.1);
        assert!(BLOCKED_STUN_MS < HIT_STUN_MS);
        assert!(BLOCKED_DAMAGE_FACTOR > 0.0 && BLOCKED_DAMAGE_FACTOR < 1.0);
    }

    #[test]
    fn test_spawns_fit_inside_arena() {
        for (x, _) in [P1_SPAWN, P2_SPAWN] {
            assert!(x >= 0.0 && x <= ARENA_WIDTH - FIGHTER_WIDTH);
        }
    }
}
