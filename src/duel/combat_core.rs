//! Combat Resolver
//!
//! Turns an attack intent into a started attack and, when the directional
//! hitbox connects, into damage, knockback and stun on the defender.

use bevy::log::debug;
use smallvec::SmallVec;

use super::arena::Rect;
use super::constants::*;
use super::fighter::{Facing, Fighter, FighterId, FighterView};

/// A connected attack, emitted for the log and effect collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: FighterId,
    pub defender: FighterId,
    /// Point of impact (the defender's body center)
    pub x: f32,
    pub y: f32,
    /// Damage actually dealt
    pub damage: u32,
    pub blocked: bool,
    /// Simulation time of the hit in milliseconds
    pub at_ms: f32,
}

/// The rectangle an attack covers: flush against the attacker's facing side,
/// `HITBOX_REACH` deep, and padded above and below the body.
pub fn attack_hitbox(attacker: &FighterView) -> Rect {
    let x = match attacker.facing {
        Facing::Right => attacker.x + FIGHTER_WIDTH,
        Facing::Left => attacker.x - HITBOX_REACH,
    };
    Rect::new(
        x,
        attacker.y - HITBOX_VERTICAL_PADDING,
        HITBOX_REACH,
        FIGHTER_HEIGHT + 2.0 * HITBOX_VERTICAL_PADDING,
    )
}

/// Whether an attack by `attacker` right now would connect with `defender`.
pub fn is_in_range(attacker: &FighterView, defender: &FighterView) -> bool {
    let (_, attacker_y) = attacker.center();
    let (_, defender_y) = defender.center();

    attack_hitbox(attacker).overlaps(&defender.body())
        && (attacker_y - defender_y).abs() < MAX_VERTICAL_HIT_DISTANCE
}

/// Damage a blocked hit deals: the base damage scaled down and rounded up.
pub fn blocked_damage() -> u32 {
    (BASE_DAMAGE as f32 * BLOCKED_DAMAGE_FACTOR).ceil() as u32
}

/// Resolve one attack attempt.
///
/// Nothing happens unless the attack was requested and the attacker is able
/// to swing. A permitted swing always starts the attack (and its cooldown),
/// whether or not it lands.
pub fn try_attack(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    requested: bool,
    now: f32,
) -> Option<HitEvent> {
    if !requested || !attacker.can_attack(now) {
        return None;
    }

    attacker.start_attack(now);
    let attacker = attacker.view();
    land_hit(&attacker, defender, now)
}

/// Resolve both fighters' attack requests for one tick.
///
/// Both swings are permitted against the state before either lands, so two
/// fighters trading blows on the same tick both connect. Hits come back in
/// p1, p2 order.
pub fn resolve_exchange(
    fighters: &mut [Fighter; 2],
    requested: [bool; 2],
    now: f32,
) -> SmallVec<[HitEvent; 2]> {
    let permitted = [0, 1].map(|i| requested[i] && fighters[i].can_attack(now));

    for (fighter, permitted) in fighters.iter_mut().zip(permitted) {
        if permitted {
            fighter.start_attack(now);
        }
    }
    let views = [fighters[0].view(), fighters[1].view()];

    let mut hits = SmallVec::new();
    for (index, permitted) in permitted.into_iter().enumerate() {
        if !permitted {
            continue;
        }
        let defender = &mut fighters[1 - index];
        if let Some(hit) = land_hit(&views[index], defender, now) {
            hits.push(hit);
        }
    }
    hits
}

/// Apply a started swing to the defender if the hitbox connects.
fn land_hit(attacker: &FighterView, defender: &mut Fighter, now: f32) -> Option<HitEvent> {
    if !is_in_range(attacker, &defender.view()) {
        return None;
    }

    let blocked = defender.is_blocking;
    let damage = if blocked { blocked_damage() } else { BASE_DAMAGE };
    defender.take_damage(damage);

    // Knock away from the attacker regardless of which way either one faces
    let (attacker_x, _) = attacker.center();
    let (defender_x, defender_y) = defender.center();
    let direction = if defender_x > attacker_x {
        1.0
    } else if defender_x < attacker_x {
        -1.0
    } else {
        attacker.facing.sign()
    };

    let (knockback, stun) = if blocked {
        (BLOCKED_KNOCKBACK, BLOCKED_STUN_MS)
    } else {
        (KNOCKBACK, HIT_STUN_MS)
    };
    defender.apply_knockback(direction, knockback);
    defender.apply_stun(now + stun);

    debug!(
        "{} hits {} for {} (blocked: {}), {} health left",
        attacker.id.as_str(),
        defender.id.as_str(),
        damage,
        blocked,
        defender.health
    );

    Some(HitEvent {
        attacker: attacker.id,
        defender: defender.id,
        x: defender_x,
        y: defender_y,
        damage,
        blocked,
        at_ms: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::fighter::ControlScheme;

    const NOW: f32 = 5000.0;

    /// Two grounded fighters on the same floor level.
    fn pair(attacker_x: f32, defender_x: f32) -> (Fighter, Fighter) {
        let mut attacker = Fighter::new(FighterId::P1, ControlScheme::Primary);
        let mut defender = Fighter::new(FighterId::P2, ControlScheme::Secondary);
        for (fighter, x) in [(&mut attacker, attacker_x), (&mut defender, defender_x)] {
            fighter.x = x;
            fighter.y = 500.0;
            fighter.on_ground = true;
        }
        attacker.facing = if defender_x >= attacker_x { Facing::Right } else { Facing::Left };
        defender.facing = attacker.facing;
        (attacker, defender)
    }

    #[test]
    fn test_far_apart_is_out_of_range() {
        let (mut attacker, mut defender) = pair(200.0, 600.0);
        assert!(!is_in_range(&attacker.view(), &defender.view()));

        let hit = try_attack(&mut attacker, &mut defender, true, NOW);
        assert!(hit.is_none());
        assert_eq!(defender.health, MAX_HEALTH);
        assert!(attacker.is_attacking, "a whiff still starts the attack");
        assert_eq!(attacker.last_attack_at, Some(NOW));
    }

    #[test]
    fn test_clean_hit_damages_knocks_back_and_stuns() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);

        let hit = try_attack(&mut attacker, &mut defender, true, NOW).expect("should connect");

        assert_eq!(defender.health, 85);
        assert!(defender.velocity_y < 0.0);
        assert_eq!(defender.velocity_x, KNOCKBACK.0);
        assert!(!defender.on_ground);
        assert_eq!(defender.stun_until, NOW + HIT_STUN_MS);
        assert_eq!(hit.damage, BASE_DAMAGE);
        assert!(!hit.blocked);
        assert_eq!(hit.attacker, FighterId::P1);
        assert_eq!(hit.defender, FighterId::P2);
        assert_eq!((hit.x, hit.y), (255.0, 525.0));
    }

    #[test]
    fn test_blocked_hit_is_reduced() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        defender.is_blocking = true;

        let hit = try_attack(&mut attacker, &mut defender, true, NOW).expect("should connect");

        assert_eq!(blocked_damage(), 5);
        assert_eq!(hit.damage, 5);
        assert!(hit.blocked);
        assert_eq!(defender.health, 95);
        assert_eq!(defender.velocity_x.abs(), BLOCKED_KNOCKBACK.0);
        assert_eq!(defender.velocity_y, -BLOCKED_KNOCKBACK.1);
        assert_eq!(defender.stun_until, NOW + BLOCKED_STUN_MS);
        assert!(!defender.is_blocking, "knocked-back defender is airborne");
    }

    #[test]
    fn test_knockback_points_away_from_attacker() {
        let (mut attacker, mut defender) = pair(300.0, 260.0);
        try_attack(&mut attacker, &mut defender, true, NOW).expect("should connect");
        assert_eq!(defender.velocity_x, -KNOCKBACK.0);
    }

    #[test]
    fn test_facing_away_misses() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        attacker.facing = Facing::Left;
        assert!(try_attack(&mut attacker, &mut defender, true, NOW).is_none());
        assert_eq!(defender.health, MAX_HEALTH);
    }

    #[test]
    fn test_vertical_gap_limits_hits() {
        let (attacker, mut defender) = pair(200.0, 240.0);
        defender.y = attacker.y - 59.0;
        assert!(is_in_range(&attacker.view(), &defender.view()));
        defender.y = attacker.y - 60.0;
        assert!(!is_in_range(&attacker.view(), &defender.view()));
    }

    #[test]
    fn test_attack_on_cooldown_is_ignored() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        try_attack(&mut attacker, &mut defender, true, NOW).expect("first hit");
        defender.stun_until = 0.0;

        let again = try_attack(&mut attacker, &mut defender, true, NOW + ATTACK_COOLDOWN_MS);
        assert!(again.is_none());
        assert_eq!(defender.health, 85);
        assert_eq!(attacker.last_attack_at, Some(NOW));
    }

    #[test]
    fn test_unrequested_attack_does_nothing() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        assert!(try_attack(&mut attacker, &mut defender, false, NOW).is_none());
        assert!(!attacker.is_attacking);
        assert!(attacker.last_attack_at.is_none());
    }

    #[test]
    fn test_stun_is_never_shortened_by_a_later_hit() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        defender.stun_until = NOW + 1000.0;
        try_attack(&mut attacker, &mut defender, true, NOW).expect("should connect");
        assert_eq!(defender.stun_until, NOW + 1000.0);
    }

    #[test]
    fn test_simultaneous_swings_both_connect() {
        let (p1, mut p2) = pair(200.0, 240.0);
        p2.facing = Facing::Left;
        let mut fighters = [p1, p2];

        let hits = resolve_exchange(&mut fighters, [true, true], NOW);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].attacker, FighterId::P1);
        assert_eq!(hits[1].attacker, FighterId::P2);
        assert_eq!(fighters[0].health, 85);
        assert_eq!(fighters[1].health, 85);
        assert_eq!(fighters[0].velocity_x, -KNOCKBACK.0);
        assert_eq!(fighters[1].velocity_x, KNOCKBACK.0);
        assert_eq!(fighters[0].last_attack_at, Some(NOW));
        assert_eq!(fighters[1].last_attack_at, Some(NOW));
    }

    #[test]
    fn test_exchange_respects_stun_from_earlier_ticks() {
        let (p1, mut p2) = pair(200.0, 240.0);
        p2.facing = Facing::Left;
        p2.stun_until = NOW + 50.0;
        let mut fighters = [p1, p2];

        let hits = resolve_exchange(&mut fighters, [true, true], NOW);

        assert_eq!(hits.len(), 1);
        assert_eq!(fighters[0].health, MAX_HEALTH);
        assert_eq!(fighters[1].health, 85);
        assert_eq!(fighters[1].last_attack_at, None);
    }

    #[test]
    fn test_health_never_goes_negative() {
        let (mut attacker, mut defender) = pair(200.0, 240.0);
        defender.health = 4;
        try_attack(&mut attacker, &mut defender, true, NOW).expect("should connect");
        assert_eq!(defender.health, 0);
    }
}
