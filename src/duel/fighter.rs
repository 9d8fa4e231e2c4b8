//! Fighter state and per-tick physics
//!
//! A `Fighter` owns its kinematics and its transient combat timers. All
//! timing checks take the current simulation time (`now`, milliseconds) as an
//! argument; nothing here reads a clock.
//!
//! Fighters never see each other mutably. `update` receives a `FighterView`,
//! a copied snapshot of the opponent's public state, and only the combat
//! resolver writes damage, knockback and stun into a defender.

use serde::{Deserialize, Serialize};

use super::arena::{Arena, Rect};
use super::constants::*;

// ============================================================================
// Identity & Controls
// ============================================================================

/// Which side of the duel a fighter is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterId {
    P1,
    P2,
}

impl FighterId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FighterId::P1 => "p1",
            FighterId::P2 => "p2",
        }
    }

    /// Display name for HUDs and logs
    pub fn name(&self) -> &'static str {
        match self {
            FighterId::P1 => "Player 1",
            FighterId::P2 => "Player 2",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            FighterId::P1 => 0,
            FighterId::P2 => 1,
        }
    }

    pub fn opponent(&self) -> FighterId {
        match self {
            FighterId::P1 => FighterId::P2,
            FighterId::P2 => FighterId::P1,
        }
    }

    pub fn spawn_point(&self) -> (f32, f32) {
        match self {
            FighterId::P1 => P1_SPAWN,
            FighterId::P2 => P2_SPAWN,
        }
    }

    fn initial_facing(&self) -> Facing {
        match self {
            FighterId::P1 => Facing::Right,
            FighterId::P2 => Facing::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Where a fighter's intents come from. Chosen at construction, independent
/// of which side the fighter is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlScheme {
    /// First keyboard layout (WASD side)
    Primary,
    /// Second keyboard layout (arrow keys side)
    Secondary,
    /// The reactive computer opponent
    Computer,
}

/// One tick's worth of logical actions for a single fighter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub block: bool,
    pub attack: bool,
}

impl InputIntent {
    pub const NONE: InputIntent = InputIntent {
        move_left: false,
        move_right: false,
        jump: false,
        block: false,
        attack: false,
    };

    pub fn is_idle(&self) -> bool {
        *self == Self::NONE
    }
}

// ============================================================================
// Read-only View
// ============================================================================

/// Snapshot of a fighter's public state.
///
/// Handed to the opponent's `update` (for facing) and to computer
/// controllers. Copying it keeps mutation single-writer within a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterView {
    pub id: FighterId,
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub facing: Facing,
    pub health: u32,
    pub is_attacking: bool,
    pub is_blocking: bool,
    pub last_attack_at: Option<f32>,
    pub stun_until: f32,
}

impl FighterView {
    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, FIGHTER_WIDTH, FIGHTER_HEIGHT)
    }

    pub fn center(&self) -> (f32, f32) {
        self.body().center()
    }

    pub fn is_stunned(&self, now: f32) -> bool {
        now < self.stun_until
    }

    /// Not blocking, not stunned, and the cooldown has strictly elapsed.
    pub fn can_attack(&self, now: f32) -> bool {
        !self.is_blocking
            && !self.is_stunned(now)
            && self
                .last_attack_at
                .map_or(true, |at| now - at > ATTACK_COOLDOWN_MS)
    }
}

// ============================================================================
// Fighter
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub id: FighterId,
    pub control: ControlScheme,
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub facing: Facing,
    pub health: u32,
    pub max_health: u32,
    pub is_attacking: bool,
    /// `None` until the first attack, so the opening swing is never on cooldown.
    pub last_attack_at: Option<f32>,
    pub is_blocking: bool,
    pub stun_until: f32,
    /// Set for the single tick in which the fighter touched down.
    pub just_landed: bool,
}

impl Fighter {
    pub fn new(id: FighterId, control: ControlScheme) -> Self {
        let (x, y) = id.spawn_point();
        Self {
            id,
            control,
            x,
            y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_ground: false,
            facing: id.initial_facing(),
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            is_attacking: false,
            last_attack_at: None,
            is_blocking: false,
            stun_until: 0.0,
            just_landed: false,
        }
    }

    /// Put the fighter back on its spawn point with full health and no timers.
    pub fn reset(&mut self) {
        *self = Self::new(self.id, self.control);
    }

    pub fn view(&self) -> FighterView {
        FighterView {
            id: self.id,
            x: self.x,
            y: self.y,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
            on_ground: self.on_ground,
            facing: self.facing,
            health: self.health,
            is_attacking: self.is_attacking,
            is_blocking: self.is_blocking,
            last_attack_at: self.last_attack_at,
            stun_until: self.stun_until,
        }
    }

    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, FIGHTER_WIDTH, FIGHTER_HEIGHT)
    }

    pub fn center(&self) -> (f32, f32) {
        self.body().center()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_stunned(&self, now: f32) -> bool {
        now < self.stun_until
    }

    pub fn can_attack(&self, now: f32) -> bool {
        self.view().can_attack(now)
    }

    /// Open the attack window. Callers check `can_attack` first.
    pub fn start_attack(&mut self, now: f32) {
        self.last_attack_at = Some(now);
        self.is_attacking = true;
    }

    /// Subtract health, never going below zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Replace the current velocity with an upward knockback and go airborne.
    pub fn apply_knockback(&mut self, direction: f32, (horizontal, vertical): (f32, f32)) {
        self.velocity_x = direction * horizontal;
        self.velocity_y = -vertical;
        self.on_ground = false;
        self.is_blocking = false;
    }

    /// Extend the stun window. An existing longer stun is kept.
    pub fn apply_stun(&mut self, until: f32) {
        self.stun_until = self.stun_until.max(until);
    }

    /// Advance one tick: facing, input, gravity, integration, collision,
    /// bounds, then the attack timer.
    pub fn update(
        &mut self,
        dt_ms: f32,
        intent: &InputIntent,
        arena: &Arena,
        opponent: Option<&FighterView>,
        now: f32,
    ) {
        let dt = dt_ms / 1000.0;
        let was_on_ground = self.on_ground;

        if let Some(opponent) = opponent.filter(|o| o.id != self.id) {
            self.face_toward(opponent);
        }

        self.apply_intent(intent, now);

        if !self.on_ground {
            self.velocity_y += GRAVITY * dt;
        }

        let previous_y = self.y;
        self.x += self.velocity_x * dt;
        self.y += self.velocity_y * dt;

        self.resolve_collisions(arena, previous_y);
        self.just_landed = !was_on_ground && self.on_ground;

        self.x = self.x.clamp(0.0, arena.width() - FIGHTER_WIDTH);

        if !self.on_ground {
            self.is_blocking = false;
        }

        if self.is_attacking
            && self
                .last_attack_at
                .map_or(true, |at| now - at > ATTACK_DURATION_MS)
        {
            self.is_attacking = false;
        }
    }

    fn face_toward(&mut self, opponent: &FighterView) {
        let (my_x, _) = self.center();
        let (their_x, _) = opponent.center();
        if their_x > my_x {
            self.facing = Facing::Right;
        } else if their_x < my_x {
            self.facing = Facing::Left;
        }
    }

    /// Left is evaluated before right, so holding both moves right.
    /// A stunned fighter keeps whatever velocity knockback gave it.
    fn apply_intent(&mut self, intent: &InputIntent, now: f32) {
        if self.is_stunned(now) {
            self.is_blocking = false;
            return;
        }

        self.is_blocking = intent.block && self.on_ground;

        let speed = if self.is_blocking {
            MOVE_SPEED * BLOCK_SPEED_MULTIPLIER
        } else {
            MOVE_SPEED
        };

        self.velocity_x = 0.0;
        if intent.move_left {
            self.velocity_x = -speed;
        }
        if intent.move_right {
            self.velocity_x = speed;
        }

        if intent.jump && self.on_ground && !self.is_blocking {
            self.velocity_y = -JUMP_POWER;
            self.on_ground = false;
        }
    }

    /// Recompute `on_ground` from scratch against every platform, then the floor.
    ///
    /// Contact is swept from `previous_y`, so a long frame that carries the
    /// body clean past a thin platform still lands on it (or bonks under it).
    fn resolve_collisions(&mut self, arena: &Arena, previous_y: f32) {
        self.on_ground = false;

        for platform in arena.platforms() {
            let body = self.body();
            if !body.overlaps_horizontally(platform) {
                continue;
            }

            let penetration = body.bottom() - platform.y;
            let was_above = previous_y + FIGHTER_HEIGHT <= platform.y;
            let was_below = previous_y >= platform.bottom();
            let falling_onto = self.velocity_y > 0.0
                && penetration > 0.0
                && (self.y < platform.y || was_above);
            let resting_on = self.velocity_y >= 0.0 && penetration.abs() <= CONTACT_EPSILON;

            if falling_onto || resting_on {
                self.y = platform.y - FIGHTER_HEIGHT;
                self.velocity_y = 0.0;
                self.on_ground = true;
            } else if self.velocity_y < 0.0
                && self.y < platform.bottom()
                && (self.y > platform.y || was_below)
            {
                self.y = platform.bottom();
                self.velocity_y = 0.0;
            }
        }

        if self.y + FIGHTER_HEIGHT >= arena.floor_y() {
            self.y = arena.floor_y() - FIGHTER_HEIGHT;
            self.velocity_y = 0.0;
            self.on_ground = true;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::arena::ArenaMap;

    const DT: f32 = 1000.0 / 60.0;

    fn grounded_fighter(id: FighterId) -> Fighter {
        let mut fighter = Fighter::new(id, ControlScheme::Primary);
        let (x, _) = id.spawn_point();
        fighter.x = x;
        fighter.y = 550.0 - FIGHTER_HEIGHT;
        fighter.on_ground = true;
        fighter
    }

    fn intent(f: impl FnOnce(&mut InputIntent)) -> InputIntent {
        let mut intent = InputIntent::NONE;
        f(&mut intent);
        intent
    }

    #[test]
    fn test_fighter_settles_on_ground_from_spawn() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);

        fighter.update(DT, &InputIntent::NONE, &arena, None, DT);

        assert!(fighter.on_ground);
        assert_eq!(fighter.y, 500.0);
        assert_eq!(fighter.velocity_y, 0.0);
        assert!(fighter.just_landed);

        fighter.update(DT, &InputIntent::NONE, &arena, None, 2.0 * DT);
        assert!(fighter.on_ground, "resting fighter must stay grounded");
        assert!(!fighter.just_landed);
    }

    #[test]
    fn test_move_right_uses_full_speed() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.update(DT, &intent(|i| i.move_right = true), &arena, None, DT);
        assert_eq!(fighter.velocity_x, MOVE_SPEED);
        assert!(fighter.x > 200.0);
    }

    #[test]
    fn test_left_and_right_resolve_to_right() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        let both = intent(|i| {
            i.move_left = true;
            i.move_right = true;
        });
        fighter.update(DT, &both, &arena, None, DT);
        assert_eq!(fighter.velocity_x, MOVE_SPEED);
    }

    #[test]
    fn test_blocking_slows_and_prevents_jump() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        let block_jump_left = intent(|i| {
            i.block = true;
            i.jump = true;
            i.move_left = true;
        });
        fighter.update(DT, &block_jump_left, &arena, None, DT);

        assert!(fighter.is_blocking);
        assert!(fighter.on_ground);
        assert_eq!(fighter.velocity_x, -MOVE_SPEED * BLOCK_SPEED_MULTIPLIER);
        assert_eq!(fighter.velocity_y, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        let jump = intent(|i| i.jump = true);

        fighter.update(DT, &jump, &arena, None, DT);
        assert!(!fighter.on_ground);
        let rising = fighter.velocity_y;
        assert!(rising < 0.0);

        // Holding jump in the air does not re-launch
        fighter.update(DT, &jump, &arena, None, 2.0 * DT);
        assert!(fighter.velocity_y > rising);
    }

    #[test]
    fn test_cannot_block_in_the_air() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.y = 300.0;
        fighter.on_ground = false;

        fighter.update(DT, &intent(|i| i.block = true), &arena, None, DT);
        assert!(!fighter.is_blocking);
    }

    #[test]
    fn test_stun_suppresses_input_and_keeps_knockback() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.apply_knockback(1.0, KNOCKBACK);
        fighter.apply_stun(200.0);

        let flee = intent(|i| {
            i.move_left = true;
            i.jump = true;
            i.block = true;
        });
        fighter.update(DT, &flee, &arena, None, 100.0);

        assert_eq!(fighter.velocity_x, KNOCKBACK.0);
        assert!(!fighter.is_blocking);
    }

    #[test]
    fn test_stun_only_extends() {
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.apply_stun(500.0);
        fighter.apply_stun(300.0);
        assert_eq!(fighter.stun_until, 500.0);
        fighter.apply_stun(700.0);
        assert_eq!(fighter.stun_until, 700.0);
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.x = 2.0;
        for step in 1..=10 {
            fighter.update(DT, &intent(|i| i.move_left = true), &arena, None, step as f32 * DT);
        }
        assert_eq!(fighter.x, 0.0);

        fighter.x = ARENA_WIDTH - FIGHTER_WIDTH - 2.0;
        for step in 11..=20 {
            fighter.update(DT, &intent(|i| i.move_right = true), &arena, None, step as f32 * DT);
        }
        assert_eq!(fighter.x, ARENA_WIDTH - FIGHTER_WIDTH);
    }

    #[test]
    fn test_lands_on_raised_platform() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);
        fighter.x = 200.0;
        fighter.y = 390.0;
        fighter.velocity_y = 100.0;

        for step in 1..=30 {
            fighter.update(DT, &InputIntent::NONE, &arena, None, step as f32 * DT);
        }
        assert!(fighter.on_ground);
        assert_eq!(fighter.y, 450.0 - FIGHTER_HEIGHT);
    }

    #[test]
    fn test_walking_off_a_ledge_falls() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);
        fighter.x = 290.0;
        fighter.y = 450.0 - FIGHTER_HEIGHT;
        fighter.on_ground = true;

        for step in 1..=10 {
            fighter.update(DT, &intent(|i| i.move_right = true), &arena, None, step as f32 * DT);
        }
        assert!(fighter.y > 450.0 - FIGHTER_HEIGHT, "fighter should have dropped off the ledge");
    }

    #[test]
    fn test_head_bonk_from_below() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);
        fighter.x = 200.0;
        fighter.y = 472.0;
        fighter.velocity_y = -600.0;

        fighter.update(DT, &InputIntent::NONE, &arena, None, DT);
        assert_eq!(fighter.y, 470.0);
        assert_eq!(fighter.velocity_y, 0.0);
    }

    #[test]
    fn test_long_frame_still_lands_on_thin_platform() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);
        fighter.x = 200.0;
        fighter.y = 390.0;
        fighter.velocity_y = 800.0;

        // One capped frame carries the body from 440 to 535, past the 450..470 ledge
        fighter.update(MAX_FRAME_MS, &InputIntent::NONE, &arena, None, MAX_FRAME_MS);

        assert!(fighter.on_ground);
        assert_eq!(fighter.y, 450.0 - FIGHTER_HEIGHT);
        assert_eq!(fighter.velocity_y, 0.0);
        assert!(fighter.just_landed);
    }

    #[test]
    fn test_long_frame_still_bonks_under_thin_platform() {
        let arena = ArenaMap::Classic.build();
        let mut fighter = Fighter::new(FighterId::P1, ControlScheme::Primary);
        fighter.x = 200.0;
        fighter.y = 480.0;
        fighter.velocity_y = -600.0;

        fighter.update(MAX_FRAME_MS, &InputIntent::NONE, &arena, None, MAX_FRAME_MS);

        assert_eq!(fighter.y, 470.0);
        assert_eq!(fighter.velocity_y, 0.0);
    }

    #[test]
    fn test_faces_opponent() {
        let arena = ArenaMap::Flat.build();
        let mut p1 = grounded_fighter(FighterId::P1);
        let mut p2 = grounded_fighter(FighterId::P2);
        p2.x = 100.0;

        p1.update(DT, &InputIntent::NONE, &arena, Some(&p2.view()), DT);
        assert_eq!(p1.facing, Facing::Left);

        p2.x = 500.0;
        p1.update(DT, &InputIntent::NONE, &arena, Some(&p2.view()), 2.0 * DT);
        assert_eq!(p1.facing, Facing::Right);
    }

    #[test]
    fn test_attack_cooldown_boundary_is_strict() {
        let mut fighter = grounded_fighter(FighterId::P1);
        assert!(fighter.can_attack(0.0), "first attack is never on cooldown");

        fighter.start_attack(1000.0);
        assert!(!fighter.can_attack(1000.0 + ATTACK_COOLDOWN_MS));
        assert!(fighter.can_attack(1000.0 + ATTACK_COOLDOWN_MS + 1.0));
    }

    #[test]
    fn test_cannot_attack_while_blocking_or_stunned() {
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.is_blocking = true;
        assert!(!fighter.can_attack(0.0));

        fighter.is_blocking = false;
        fighter.apply_stun(100.0);
        assert!(!fighter.can_attack(50.0));
        assert!(fighter.can_attack(100.0));
    }

    #[test]
    fn test_attack_window_expires() {
        let arena = ArenaMap::Flat.build();
        let mut fighter = grounded_fighter(FighterId::P1);
        fighter.start_attack(0.0);

        fighter.update(DT, &InputIntent::NONE, &arena, None, ATTACK_DURATION_MS);
        assert!(fighter.is_attacking);

        fighter.update(DT, &InputIntent::NONE, &arena, None, ATTACK_DURATION_MS + 1.0);
        assert!(!fighter.is_attacking);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut fighter = grounded_fighter(FighterId::P2);
        fighter.take_damage(40);
        assert_eq!(fighter.health, 60);
        fighter.take_damage(1000);
        assert_eq!(fighter.health, 0);
        assert!(!fighter.is_alive());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut fighter = grounded_fighter(FighterId::P2);
        fighter.take_damage(30);
        fighter.apply_knockback(-1.0, KNOCKBACK);
        fighter.apply_stun(900.0);
        fighter.start_attack(400.0);
        fighter.is_blocking = true;

        fighter.reset();
        let once = fighter.clone();
        fighter.reset();

        assert_eq!(fighter, once);
        assert_eq!(fighter.health, MAX_HEALTH);
        assert_eq!((fighter.x, fighter.y), P2_SPAWN);
        assert_eq!((fighter.velocity_x, fighter.velocity_y), (0.0, 0.0));
        assert_eq!(fighter.stun_until, 0.0);
        assert!(!fighter.is_blocking);
        assert!(fighter.last_attack_at.is_none());
    }
}
