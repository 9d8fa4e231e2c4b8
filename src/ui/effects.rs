//! Particle effects
//!
//! Hit sparks and landing dust spawned from duel events. Purely visual: the
//! random numbers used here never reach the simulation.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::combat::events::{FighterHitEvent, FighterLandedEvent};
use crate::duel::{Duel, FighterId, MatchPhase, FIGHTER_HEIGHT, FIGHTER_WIDTH};

use super::scene::world_to_screen;
use super::colors;

/// Particles alive at once, oldest dropped first
pub const MAX_PARTICLES: usize = 400;
const SPARKS_PER_HIT: usize = 18;
const SPARKS_PER_BLOCK: usize = 8;
const DUST_PER_LANDING: usize = 10;
/// Grounded speed above which running kicks up dust
const RUN_DUST_MIN_SPEED: f32 = 40.0;
/// One puff every this many running frames
const RUN_DUST_INTERVAL: u32 = 6;
/// Per-frame horizontal damping at 60 fps
const PARTICLE_DRAG: f32 = 0.98;

/// Seeded random source for visual effects
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// A short-lived colored dot. Velocity is in screen space (y up).
#[derive(Component, Debug)]
pub struct Particle {
    pub velocity: Vec2,
    pub gravity: f32,
    pub life: f32,
    pub max_life: f32,
    /// Spawn order, for dropping the oldest first
    pub serial: u64,
}

#[derive(Resource, Default)]
pub struct ParticleCounter(u64);

/// Running-frame counters for p1 and p2
#[derive(Resource, Debug, Default)]
pub struct RunDust {
    frames: [u32; 2],
}

impl RunDust {
    /// Count a frame of movement; true when this frame should puff.
    pub fn step(&mut self, id: FighterId, on_ground: bool, velocity_x: f32) -> bool {
        if !on_ground || velocity_x.abs() < RUN_DUST_MIN_SPEED {
            return false;
        }
        let frames = &mut self.frames[id.index()];
        *frames += 1;
        *frames % RUN_DUST_INTERVAL == 0
    }
}

struct Burst {
    origin: Vec2,
    color: Color,
    gravity: f32,
    max_life: f32,
}

impl Burst {
    fn spawn(
        &self,
        commands: &mut Commands,
        counter: &mut ParticleCounter,
        velocity: Vec2,
        life: f32,
        size: f32,
    ) {
        counter.0 += 1;
        commands.spawn((
            Sprite::from_color(self.color, Vec2::splat(size)),
            Transform::from_translation(self.origin.extend(5.0)),
            Particle {
                velocity,
                gravity: self.gravity,
                life,
                max_life: self.max_life,
                serial: counter.0,
            },
        ));
    }
}

/// Radial spark burst at every connected hit, tinted by the defender.
pub fn spawn_hit_sparks(
    mut commands: Commands,
    mut hits: EventReader<FighterHitEvent>,
    mut rng: ResMut<GameRng>,
    mut counter: ResMut<ParticleCounter>,
) {
    for event in hits.read() {
        let hit = event.hit;
        let burst = Burst {
            origin: world_to_screen(hit.x, hit.y, 0.0, 0.0).truncate(),
            color: spark_color(hit.defender, hit.blocked),
            gravity: -500.0,
            max_life: 1.1,
        };
        let count = if hit.blocked { SPARKS_PER_BLOCK } else { SPARKS_PER_HIT };

        for _ in 0..count {
            let angle = rng.random_range(0.0, std::f32::consts::TAU);
            let speed = rng.random_range(120.0, 340.0);
            let life = rng.random_range(0.6, 1.1);
            let size = rng.random_range(4.0, 10.0);
            burst.spawn(
                &mut commands,
                &mut counter,
                Vec2::from_angle(angle) * speed,
                life,
                size,
            );
        }
    }
}

/// Dust kicked up sideways when a fighter lands.
pub fn spawn_landing_dust(
    mut commands: Commands,
    mut landings: EventReader<FighterLandedEvent>,
    mut rng: ResMut<GameRng>,
    mut counter: ResMut<ParticleCounter>,
) {
    for event in landings.read() {
        let burst = Burst {
            origin: world_to_screen(event.x, event.y, 0.0, 0.0).truncate(),
            color: colors::DUST,
            gravity: -800.0,
            max_life: 0.9,
        };
        for _ in 0..DUST_PER_LANDING {
            let direction = rng.random_range(-1.0, 1.0);
            let speed = rng.random_range(80.0, 200.0);
            let rise = rng.random_range(60.0, 140.0);
            let life = rng.random_range(0.5, 0.9);
            let size = rng.random_range(4.0, 8.0);
            burst.spawn(
                &mut commands,
                &mut counter,
                Vec2::new(direction * speed, rise),
                life,
                size,
            );
        }
    }
}

/// Small puffs behind the trailing foot of a running fighter.
pub fn spawn_run_dust(
    mut commands: Commands,
    duel: Res<Duel>,
    mut run_dust: ResMut<RunDust>,
    mut rng: ResMut<GameRng>,
    mut counter: ResMut<ParticleCounter>,
) {
    if duel.phase() != MatchPhase::Playing {
        return;
    }

    for fighter in duel.fighters() {
        if !run_dust.step(fighter.id, fighter.on_ground, fighter.velocity_x) {
            continue;
        }

        let moving_right = fighter.velocity_x > 0.0;
        let heel_x = if moving_right {
            fighter.x
        } else {
            fighter.x + FIGHTER_WIDTH
        };
        let burst = Burst {
            origin: world_to_screen(heel_x, fighter.y + FIGHTER_HEIGHT - 2.0, 0.0, 0.0)
                .truncate(),
            color: colors::RUN_DUST,
            gravity: -700.0,
            max_life: 0.6,
        };
        let backwards = if moving_right { -1.0 } else { 1.0 };
        let velocity = Vec2::new(
            backwards * rng.random_range(30.0, 70.0),
            rng.random_range(20.0, 40.0),
        );
        let size = rng.random_range(3.0, 7.0);
        burst.spawn(&mut commands, &mut counter, velocity, 0.4, size);
    }
}

/// Move, fade and expire particles. Frozen while the duel is paused.
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    duel: Res<Duel>,
    mut particles: Query<(Entity, &mut Particle, &mut Transform, &mut Sprite)>,
) {
    if duel.phase() == MatchPhase::Paused {
        return;
    }

    let dt = time.delta_secs();
    let drag = PARTICLE_DRAG.powf(dt * 60.0);
    for (entity, mut particle, mut transform, mut sprite) in &mut particles {
        particle.life -= dt;
        if particle.life <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }

        particle.velocity.x *= drag;
        particle.velocity.y += particle.gravity * dt;
        transform.translation += (particle.velocity * dt).extend(0.0);
        sprite.color.set_alpha(particle.life / particle.max_life);
    }
}

/// Drop the oldest particles beyond `MAX_PARTICLES`.
pub fn cap_particles(mut commands: Commands, particles: Query<(Entity, &Particle)>) {
    let alive = particles.iter().count();
    if alive <= MAX_PARTICLES {
        return;
    }

    let mut by_age: Vec<(u64, Entity)> = particles.iter().map(|(e, p)| (p.serial, e)).collect();
    by_age.sort_unstable_by_key(|(serial, _)| *serial);
    for (_, entity) in by_age.into_iter().take(alive - MAX_PARTICLES) {
        commands.entity(entity).despawn();
    }
}

/// Blocked hits spark in a neutral color, clean hits in the defender's.
pub fn spark_color(defender: FighterId, blocked: bool) -> Color {
    if blocked {
        colors::BLOCK_SPARK
    } else {
        colors::fighter(defender)
    }
}
