//! Asteroids: ship, rocks and bullets on a torus
//!
//! Velocities are pixels per tick. The ship and the rocks wrap around the
//! world edges; bullets don't and simply expire after `BULLET_LIFE` ticks.
//! Shooting a rock above `SPLIT_THRESHOLD` breaks it into two half-size
//! rocks. Clearing the field brings in a fresh wave, forever.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{circle_overlap, wrap_toroidal};
use super::session::{Engine, Intent, SessionStatus};

/// World dimensions
pub const WORLD_WIDTH: f32 = 600.0;
pub const WORLD_HEIGHT: f32 = 400.0;
pub const WORLD_SIZE: Vec2 = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);

/// Ship handling
pub const SHIP_RADIUS: f32 = 15.0;
/// Radians per tick while a turn key is held
pub const ROTATION_SPEED: f32 = 0.1;
pub const THRUST: f32 = 0.15;
/// Velocity multiplier applied every tick
pub const FRICTION: f32 = 0.99;

/// Bullets
pub const BULLET_SPEED: f32 = 5.0;
pub const BULLET_LIFE: u32 = 60;
pub const BULLET_RADIUS: f32 = 3.0;

/// Rocks
pub const ASTEROID_START_SIZE: f32 = 40.0;
/// Rocks strictly larger than this split when shot
pub const SPLIT_THRESHOLD: f32 = 15.0;
pub const WAVE_SIZE: usize = 5;

/// Points per rock hit
pub const HIT_REWARD: u64 = 10;

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians, 0 = +x
    pub angle: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: WORLD_SIZE / 2.0,
            vel: Vec2::ZERO,
            angle: 0.0,
        }
    }
}

impl Ship {
    #[inline]
    pub fn heading(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

/// A rock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision radius
    pub size: f32,
    /// Visual orientation only
    pub heading: f32,
}

impl Asteroid {
    /// Random velocity and heading; random position unless one is given
    pub fn spawn<R: Rng>(rng: &mut R, pos: Option<Vec2>, size: f32) -> Self {
        let pos = pos.unwrap_or_else(|| {
            Vec2::new(
                rng.random_range(0.0..WORLD_WIDTH),
                rng.random_range(0.0..WORLD_HEIGHT),
            )
        });
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
            size,
            heading: rng.random_range(0.0..TAU),
        }
    }

    /// Two half-size rocks at this position, or None if too small to split
    pub fn split<R: Rng>(&self, rng: &mut R) -> Option<[Asteroid; 2]> {
        if self.size <= SPLIT_THRESHOLD {
            return None;
        }
        let size = self.size / 2.0;
        Some([
            Asteroid::spawn(rng, Some(self.pos), size),
            Asteroid::spawn(rng, Some(self.pos), size),
        ])
    }
}

/// A shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before the bullet disappears
    pub life: u32,
}

/// Held ship controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
}

/// A fresh wave of full-size rocks
pub fn spawn_wave<R: Rng>(rng: &mut R) -> Vec<Asteroid> {
    (0..WAVE_SIZE)
        .map(|_| Asteroid::spawn(rng, None, ASTEROID_START_SIZE))
        .collect()
}

/// Complete Asteroids session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidsState {
    pub status: SessionStatus,
    pub score: u64,
    pub time_ticks: u64,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub held: HeldKeys,
    /// Waves spawned this session, starting at 1
    pub wave: u32,
}

impl AsteroidsState {
    fn new(status: SessionStatus, asteroids: Vec<Asteroid>) -> Self {
        Self {
            status,
            score: 0,
            time_ticks: 0,
            ship: Ship::default(),
            asteroids,
            bullets: Vec::new(),
            held: HeldKeys::default(),
            wave: 1,
        }
    }
}

/// Asteroids engine
#[derive(Debug, Clone)]
pub struct AsteroidsEngine {
    state: AsteroidsState,
    rng: Pcg32,
}

impl AsteroidsEngine {
    /// Rocks are already drifting before the first intent
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let asteroids = spawn_wave(&mut rng);
        Self {
            state: AsteroidsState::new(SessionStatus::NotStarted, asteroids),
            rng,
        }
    }

    pub fn state(&self) -> &AsteroidsState {
        &self.state
    }

    fn fire(&mut self) {
        let ship = &self.state.ship;
        self.state.bullets.push(Bullet {
            pos: ship.pos,
            vel: ship.heading() * BULLET_SPEED,
            life: BULLET_LIFE,
        });
    }

    fn update_ship(&mut self) {
        let AsteroidsState { ship, held, .. } = &mut self.state;
        if held.left {
            ship.angle -= ROTATION_SPEED;
        }
        if held.right {
            ship.angle += ROTATION_SPEED;
        }
        if held.thrust {
            ship.vel += ship.heading() * THRUST;
        }
        ship.vel *= FRICTION;
        ship.pos = wrap_toroidal(ship.pos + ship.vel, WORLD_SIZE);
    }

    /// Drift every rock; returns true if any of them touches the ship
    fn update_asteroids(&mut self) -> bool {
        let AsteroidsState {
            ship, asteroids, ..
        } = &mut self.state;
        let mut ship_hit = false;
        for asteroid in asteroids.iter_mut() {
            asteroid.pos = wrap_toroidal(asteroid.pos + asteroid.vel, WORLD_SIZE);
            if circle_overlap(ship.pos, SHIP_RADIUS, asteroid.pos, asteroid.size) {
                ship_hit = true;
            }
        }
        ship_hit
    }

    /// Move bullets, expire them, resolve hits in a single pass
    ///
    /// A bullet takes out at most the first rock it overlaps. Fragments join
    /// the field after the pass, so they can't be hit on the tick they appear.
    fn update_bullets(&mut self) {
        let bullets = std::mem::take(&mut self.state.bullets);
        let mut fragments = Vec::new();

        for mut bullet in bullets {
            bullet.pos += bullet.vel;
            bullet.life = bullet.life.saturating_sub(1);
            if bullet.life == 0 {
                continue;
            }

            let hit = self
                .state
                .asteroids
                .iter()
                .position(|a| circle_overlap(bullet.pos, BULLET_RADIUS, a.pos, a.size));

            match hit {
                Some(idx) => {
                    let asteroid = self.state.asteroids.remove(idx);
                    self.state.score += HIT_REWARD;
                    if let Some(children) = asteroid.split(&mut self.rng) {
                        log::debug!("Asteroid split: size {} -> 2 x {}", asteroid.size, children[0].size);
                        fragments.extend(children);
                    }
                }
                None => self.state.bullets.push(bullet),
            }
        }

        self.state.asteroids.extend(fragments);
    }
}

impl Engine for AsteroidsEngine {
    type Snapshot = AsteroidsState;

    fn apply_intent(&mut self, intent: Intent) {
        if !matches!(
            intent,
            Intent::Left | Intent::Right | Intent::Thrust | Intent::Fire
        ) {
            return;
        }

        match self.state.status {
            SessionStatus::NotStarted => {
                // The starting key only starts the game
                self.reset();
                return;
            }
            SessionStatus::Running => {}
            SessionStatus::Over | SessionStatus::Won => return,
        }

        match intent {
            Intent::Left => self.state.held.left = true,
            Intent::Right => self.state.held.right = true,
            Intent::Thrust => self.state.held.thrust = true,
            Intent::Fire => self.fire(),
            _ => {}
        }
    }

    fn release_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Left => self.state.held.left = false,
            Intent::Right => self.state.held.right = false,
            Intent::Thrust => self.state.held.thrust = false,
            _ => {}
        }
    }

    fn tick(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }
        self.state.time_ticks += 1;

        self.update_ship();

        if self.update_asteroids() {
            log::info!("Ship destroyed, score {}", self.state.score);
            self.state.status = SessionStatus::Over;
            return;
        }

        self.update_bullets();

        if self.state.asteroids.is_empty() {
            self.state.asteroids = spawn_wave(&mut self.rng);
            self.state.wave += 1;
            log::info!("Asteroids wave {} incoming", self.state.wave);
        }
    }

    fn reset(&mut self) {
        let asteroids = spawn_wave(&mut self.rng);
        self.state = AsteroidsState::new(SessionStatus::Running, asteroids);
        log::info!("Asteroids reset");
    }

    fn status(&self) -> SessionStatus {
        self.state.status
    }

    fn score(&self) -> u64 {
        self.state.score
    }

    fn ticks(&self) -> u64 {
        self.state.time_ticks
    }

    fn snapshot(&self) -> AsteroidsState {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rock(pos: Vec2, size: f32) -> Asteroid {
        Asteroid {
            pos,
            vel: Vec2::ZERO,
            size,
            heading: 0.0,
        }
    }

    /// Running session with a single parked rock far from the ship
    fn quiet_field(seed: u64) -> AsteroidsEngine {
        let mut engine = AsteroidsEngine::new(seed);
        engine.reset();
        engine.state.asteroids = vec![rock(Vec2::new(30.0, 30.0), 10.0)];
        engine
    }

    /// Shoot straight right until the bullet list changes
    fn shoot_and_wait(engine: &mut AsteroidsEngine) {
        engine.apply_intent(Intent::Fire);
        for _ in 0..BULLET_LIFE {
            engine.tick();
            if engine.state().bullets.is_empty() {
                break;
            }
        }
    }

    #[test]
    fn test_initial_wave_before_start() {
        let engine = AsteroidsEngine::new(77);
        let state = engine.state();
        assert_eq!(state.status, SessionStatus::NotStarted);
        assert_eq!(state.asteroids.len(), WAVE_SIZE);
        for a in &state.asteroids {
            assert_eq!(a.size, ASTEROID_START_SIZE);
            assert!(a.pos.x >= 0.0 && a.pos.x < WORLD_WIDTH);
            assert!(a.pos.y >= 0.0 && a.pos.y < WORLD_HEIGHT);
            assert!(a.vel.x.abs() <= 1.0 && a.vel.y.abs() <= 1.0);
        }
    }

    #[test]
    fn test_starting_intent_only_starts() {
        let mut engine = AsteroidsEngine::new(1);
        engine.apply_intent(Intent::Down);
        assert_eq!(engine.status(), SessionStatus::NotStarted);

        engine.apply_intent(Intent::Fire);
        assert_eq!(engine.status(), SessionStatus::Running);
        assert!(engine.state().bullets.is_empty());
    }

    #[test]
    fn test_rotation_and_thrust() {
        let mut engine = quiet_field(2);

        engine.apply_intent(Intent::Right);
        for _ in 0..5 {
            engine.tick();
        }
        assert!((engine.state().ship.angle - 0.5).abs() < 1e-5);

        engine.release_intent(Intent::Right);
        engine.apply_intent(Intent::Left);
        for _ in 0..5 {
            engine.tick();
        }
        assert!(engine.state().ship.angle.abs() < 1e-5);
        engine.release_intent(Intent::Left);

        engine.apply_intent(Intent::Thrust);
        engine.tick();
        let ship = &engine.state().ship;
        assert!((ship.vel.x - THRUST * FRICTION).abs() < 1e-6);
        assert!((ship.pos.x - (300.0 + THRUST * FRICTION)).abs() < 1e-4);
    }

    #[test]
    fn test_friction_without_thrust() {
        let mut engine = quiet_field(3);
        engine.state.ship.vel = Vec2::new(10.0, 0.0);
        engine.tick();
        assert!((engine.state().ship.vel.x - 9.9).abs() < 1e-5);
    }

    #[test]
    fn test_ship_wraps() {
        let mut engine = quiet_field(4);
        engine.state.ship.pos = Vec2::new(599.0, 200.0);
        engine.state.ship.vel = Vec2::new(5.0, 0.0);

        engine.tick();
        let ship = &engine.state().ship;
        assert!((ship.pos.x - 3.95).abs() < 1e-3);
        assert_eq!(engine.status(), SessionStatus::Running);
    }

    #[test]
    fn test_asteroid_wraps() {
        let mut engine = quiet_field(5);
        engine.state.asteroids[0].vel = Vec2::new(-40.0, -40.0);

        engine.tick();
        let a = &engine.state().asteroids[0];
        assert!((a.pos.x - 590.0).abs() < 1e-3);
        assert!((a.pos.y - 390.0).abs() < 1e-3);
    }

    #[test]
    fn test_ship_collision_ends_game() {
        let mut engine = quiet_field(6);
        engine.state.asteroids.push(rock(Vec2::new(320.0, 200.0), 10.0));

        engine.tick();
        assert_eq!(engine.status(), SessionStatus::Over);

        let ticks = engine.ticks();
        engine.apply_intent(Intent::Fire);
        engine.tick();
        assert_eq!(engine.ticks(), ticks);
        assert!(engine.state().bullets.is_empty());
    }

    #[test]
    fn test_key_up_clears_held_after_game_over() {
        let mut engine = quiet_field(12);
        engine.apply_intent(Intent::Left);
        engine.apply_intent(Intent::Thrust);
        engine.state.asteroids.push(rock(engine.state.ship.pos, 10.0));

        engine.tick();
        assert_eq!(engine.status(), SessionStatus::Over);
        assert!(engine.state().held.left && engine.state().held.thrust);

        engine.release_intent(Intent::Left);
        engine.release_intent(Intent::Thrust);
        assert_eq!(engine.state().held, HeldKeys::default());
    }

    #[test]
    fn test_bullet_expires() {
        let mut engine = quiet_field(7);
        engine.apply_intent(Intent::Fire);
        assert_eq!(engine.state().bullets.len(), 1);

        for _ in 0..BULLET_LIFE - 1 {
            engine.tick();
        }
        assert_eq!(engine.state().bullets.len(), 1);
        assert_eq!(engine.state().bullets[0].life, 1);
        // Not wrapped: it's past the right edge by now
        assert!(engine.state().bullets[0].pos.x > 580.0);

        engine.tick();
        assert!(engine.state().bullets.is_empty());
    }

    #[test]
    fn test_large_rock_splits() {
        let mut engine = quiet_field(8);
        engine.state.asteroids = vec![rock(Vec2::new(400.0, 200.0), ASTEROID_START_SIZE)];

        shoot_and_wait(&mut engine);

        let state = engine.state();
        assert_eq!(state.score, HIT_REWARD);
        assert!(state.bullets.is_empty());
        assert_eq!(state.asteroids.len(), 2);
        for child in &state.asteroids {
            assert_eq!(child.size, ASTEROID_START_SIZE / 2.0);
        }
    }

    #[test]
    fn test_small_rock_destroyed_and_new_wave() {
        let mut engine = quiet_field(9);
        engine.state.asteroids = vec![rock(Vec2::new(400.0, 200.0), 10.0)];

        shoot_and_wait(&mut engine);

        let state = engine.state();
        assert_eq!(state.score, HIT_REWARD);
        assert_eq!(state.wave, 2);
        assert_eq!(state.asteroids.len(), WAVE_SIZE);
        assert!(state.asteroids.iter().all(|a| a.size == ASTEROID_START_SIZE));
        assert_eq!(state.status, SessionStatus::Running);
    }

    #[test]
    fn test_bullet_hits_only_first_rock() {
        let mut engine = quiet_field(10);
        engine.state.asteroids = vec![
            rock(Vec2::new(400.0, 200.0), 12.0),
            rock(Vec2::new(400.0, 200.0), 12.0),
        ];

        shoot_and_wait(&mut engine);

        assert_eq!(engine.score(), HIT_REWARD);
        assert_eq!(engine.state().asteroids.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = AsteroidsEngine::new(31337);
        let mut b = AsteroidsEngine::new(31337);
        a.reset();
        b.reset();
        for i in 0..120 {
            if i % 10 == 0 {
                a.apply_intent(Intent::Fire);
                b.apply_intent(Intent::Fire);
            }
            a.tick();
            b.tick();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    proptest! {
        #[test]
        fn split_yields_two_halves(seed in any::<u64>(), size in 15.5f32..80.0) {
            let mut engine = quiet_field(seed);
            engine.state.asteroids = vec![rock(Vec2::new(400.0, 200.0), size)];
            let before = engine.state().asteroids.len();

            shoot_and_wait(&mut engine);

            let state = engine.state();
            prop_assert_eq!(state.asteroids.len(), before + 1);
            for child in &state.asteroids {
                prop_assert_eq!(child.size, size / 2.0);
                prop_assert!((child.pos - Vec2::new(400.0, 200.0)).length() < 1e-3);
            }
        }

        #[test]
        fn bodies_stay_on_the_torus(
            seed in any::<u64>(),
            keys in prop::collection::vec(0u8..4, 1..300),
        ) {
            let mut engine = AsteroidsEngine::new(seed);
            engine.reset();
            for key in keys {
                match key {
                    0 => engine.apply_intent(Intent::Thrust),
                    1 => engine.apply_intent(Intent::Left),
                    2 => engine.release_intent(Intent::Left),
                    _ => engine.apply_intent(Intent::Fire),
                }
                engine.tick();
                let state = engine.state();
                let in_world = |p: Vec2| p.x >= 0.0 && p.x < WORLD_WIDTH && p.y >= 0.0 && p.y < WORLD_HEIGHT;
                prop_assert!(in_world(state.ship.pos));
                for a in &state.asteroids {
                    prop_assert!(in_world(a.pos));
                }
                if state.status == SessionStatus::Over {
                    break;
                }
            }
        }
    }
}
