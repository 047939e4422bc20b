/// A single drifting point of the background network.

use rand::Rng;

use super::geom::{Extent, Vec2};

/// Drawing radius in px. Not used for physics.
pub const PARTICLE_RADIUS: f32 = 2.0;
/// Largest absolute velocity component, px per frame.
pub const MAX_SPEED: f32 = 0.25;

/// Which axes flipped during the last `advance`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Particle { pos, vel, radius: PARTICLE_RADIUS }
    }

    /// Uniform position inside `extent`, velocity in [-MAX_SPEED, MAX_SPEED).
    pub fn random<R: Rng + ?Sized>(extent: Extent, rng: &mut R) -> Self {
        let pos = Vec2::new(
            rng.gen::<f32>() * extent.width,
            rng.gen::<f32>() * extent.height,
        );
        let vel = Vec2::new(
            rng.gen_range(-MAX_SPEED..MAX_SPEED),
            rng.gen_range(-MAX_SPEED..MAX_SPEED),
        );
        Particle::new(pos, vel)
    }

    /// Move one frame, then flip any velocity component whose axis is out of
    /// bounds. Position is never clamped, so a particle stranded more than one
    /// step outside (after a shrink) flips every frame and stays put.
    pub fn advance(&mut self, extent: Extent) -> Reflection {
        self.pos += self.vel;

        let mut hit = Reflection::default();
        if self.pos.x < 0.0 || self.pos.x > extent.width {
            self.vel.x = -self.vel.x;
            hit.x = true;
        }
        if self.pos.y < 0.0 || self.pos.y > extent.height {
            self.vel.y = -self.vel.y;
            hit.y = true;
        }
        hit
    }
}
