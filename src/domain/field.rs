/// Particle network: a fixed set of drifting points joined by fading links.
///
/// Each frame:
///   1. Clear the surface
///   2. For every particle, in creation order:
///      - advance and reflect off the surface edges
///      - draw the particle
///      - link it to the pointer when closer than `POINTER_LINK_DISTANCE`
///      - link it to every *later* particle closer than `LINK_DISTANCE`
///
/// Later particles have not moved yet when an earlier one is linked to them,
/// so every unordered pair is checked exactly once per frame.
///
/// The field never touches the terminal. It draws through `Surface`, which
/// the presentation layer implements (see `ui::canvas::DotCanvas`).

use rand::Rng;

use super::geom::{Extent, Vec2};
use super::particle::Particle;

pub const PARTICLE_COUNT: usize = 100;
pub const PARTICLE_ALPHA: f32 = 0.5;
pub const LINK_DISTANCE: f32 = 100.0;
pub const POINTER_LINK_DISTANCE: f32 = 150.0;
/// Alpha of a link at zero distance.
pub const LINK_ALPHA: f32 = 0.2;

/// A 2D target that can draw translucent white shapes.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, alpha: f32);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, alpha: f32);
}

/// Counters for one frame, mostly for tests and debug logging.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameStats {
    pub particles: usize,
    pub pair_checks: usize,
    pub reflections: usize,
    pub links: usize,
    pub pointer_links: usize,
}

/// Link opacity for a given distance, or `None` at/after the cutoff.
pub fn link_alpha(distance: f32, threshold: f32) -> Option<f32> {
    if distance < threshold {
        Some(LINK_ALPHA * (1.0 - distance / threshold))
    } else {
        None
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Scatter `PARTICLE_COUNT` particles over `extent`.
    pub fn spawn<R: Rng + ?Sized>(extent: Extent, rng: &mut R) -> Self {
        Self::with_count(PARTICLE_COUNT, extent, rng)
    }

    pub fn with_count<R: Rng + ?Sized>(count: usize, extent: Extent, rng: &mut R) -> Self {
        let particles = (0..count).map(|_| Particle::random(extent, rng)).collect();
        ParticleField { particles }
    }

    #[cfg(test)]
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        ParticleField { particles }
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Advance one frame and draw it onto `surface`.
    pub fn step<S: Surface + ?Sized>(&mut self, extent: Extent, pointer: Vec2, surface: &mut S) -> FrameStats {
        let mut stats = FrameStats { particles: self.particles.len(), ..FrameStats::default() };
        surface.clear();

        for i in 0..self.particles.len() {
            let hit = self.particles[i].advance(extent);
            if hit.x || hit.y {
                stats.reflections += 1;
            }
            let p = self.particles[i];

            surface.fill_circle(p.pos, p.radius, PARTICLE_ALPHA);

            if let Some(alpha) = link_alpha(p.pos.distance(pointer), POINTER_LINK_DISTANCE) {
                surface.stroke_line(p.pos, pointer, alpha);
                stats.pointer_links += 1;
            }

            for other in &self.particles[i + 1..] {
                stats.pair_checks += 1;
                if let Some(alpha) = link_alpha(p.pos.distance(other.pos), LINK_DISTANCE) {
                    surface.stroke_line(p.pos, other.pos, alpha);
                    stats.links += 1;
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Circle(Vec2, f32, f32),
        Line(Vec2, Vec2, f32),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, alpha: f32) {
            self.ops.push(Op::Circle(center, radius, alpha));
        }
        fn stroke_line(&mut self, from: Vec2, to: Vec2, alpha: f32) {
            self.ops.push(Op::Line(from, to, alpha));
        }
    }

    fn still(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO)
    }

    const FAR: Vec2 = Vec2::new(-10_000.0, -10_000.0);

    #[test]
    fn spawn_creates_fixed_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = ParticleField::spawn(Extent::new(800.0, 600.0), &mut rng);
        assert_eq!(field.len(), PARTICLE_COUNT);
    }

    #[test]
    fn every_pair_checked_once() {
        let extent = Extent::new(1600.0, 900.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = ParticleField::spawn(extent, &mut rng);
        let mut rec = Recorder::default();

        for _ in 0..3 {
            let stats = field.step(extent, Vec2::new(800.0, 450.0), &mut rec);
            assert_eq!(stats.particles, 100);
            assert_eq!(stats.pair_checks, 4950);
        }
    }

    #[test]
    fn frame_starts_with_clear_and_draws_each_particle() {
        let extent = Extent::new(500.0, 500.0);
        let mut field = ParticleField::from_particles(vec![
            still(10.0, 10.0),
            still(400.0, 400.0),
        ]);
        let mut rec = Recorder::default();
        field.step(extent, FAR, &mut rec);

        assert_eq!(rec.ops.first(), Some(&Op::Clear));
        let circles = rec.ops.iter().filter(|op| matches!(op, Op::Circle(_, r, a) if *r == 2.0 && *a == 0.5)).count();
        assert_eq!(circles, 2);
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Line(..))));
    }

    #[test]
    fn close_particles_link_with_fading_alpha() {
        let extent = Extent::new(500.0, 500.0);
        let mut field = ParticleField::from_particles(vec![
            still(100.0, 100.0),
            still(150.0, 100.0), // 50 apart
        ]);
        let mut rec = Recorder::default();
        let stats = field.step(extent, FAR, &mut rec);

        assert_eq!(stats.links, 1);
        let line = rec.ops.iter().find_map(|op| match op {
            Op::Line(a, b, alpha) => Some((*a, *b, *alpha)),
            _ => None,
        });
        let (a, b, alpha) = line.expect("link drawn");
        assert_eq!(a, Vec2::new(100.0, 100.0));
        assert_eq!(b, Vec2::new(150.0, 100.0));
        assert!((alpha - 0.1).abs() < 1e-6);
    }

    #[test]
    fn no_link_at_threshold() {
        let extent = Extent::new(500.0, 500.0);
        let mut field = ParticleField::from_particles(vec![
            still(100.0, 100.0),
            still(200.0, 100.0), // exactly 100 apart
        ]);
        let mut rec = Recorder::default();
        let stats = field.step(extent, FAR, &mut rec);
        assert_eq!(stats.pair_checks, 1);
        assert_eq!(stats.links, 0);
    }

    #[test]
    fn pointer_links_within_150() {
        let extent = Extent::new(500.0, 500.0);
        let mut field = ParticleField::from_particles(vec![
            still(100.0, 100.0), // 120 from pointer
            still(100.0, 400.0), // far
        ]);
        let pointer = Vec2::new(220.0, 100.0);
        let mut rec = Recorder::default();
        let stats = field.step(extent, pointer, &mut rec);

        assert_eq!(stats.pointer_links, 1);
        let alpha = rec.ops.iter().find_map(|op| match op {
            Op::Line(from, to, alpha) if *to == pointer => {
                assert_eq!(*from, Vec2::new(100.0, 100.0));
                Some(*alpha)
            }
            _ => None,
        });
        let expected = 0.2 * (1.0 - 120.0 / 150.0);
        assert!((alpha.expect("pointer link") - expected).abs() < 1e-6);
    }

    #[test]
    fn later_particles_linked_at_pre_frame_position() {
        let extent = Extent::new(500.0, 500.0);
        let mut field = ParticleField::from_particles(vec![
            still(100.0, 100.0),
            Particle::new(Vec2::new(190.0, 100.0), Vec2::new(20.0, 0.0)),
        ]);
        let mut rec = Recorder::default();
        let stats = field.step(extent, FAR, &mut rec);
        // 90 apart before the second particle moves this frame
        assert_eq!(stats.links, 1);
        assert_eq!(field.particles()[1].pos, Vec2::new(210.0, 100.0));
    }

    #[test]
    fn link_alpha_decreases_to_zero() {
        assert_eq!(link_alpha(0.0, 100.0), Some(0.2));
        assert_eq!(link_alpha(100.0, 100.0), None);
        assert_eq!(link_alpha(150.0, 100.0), None);
        assert_eq!(link_alpha(149.0, 150.0).map(|a| a > 0.0), Some(true));

        let mut prev = f32::MAX;
        for d in 0..100 {
            let a = link_alpha(d as f32, 100.0).unwrap();
            assert!(a < prev);
            prev = a;
        }
    }

    #[test]
    fn resize_changes_bounds_not_particles() {
        let mut field = ParticleField::from_particles(vec![
            Particle::new(Vec2::new(95.0, 10.0), Vec2::new(0.25, 0.0)),
        ]);
        let mut rec = Recorder::default();

        // Surface grew: no reflection at the old edge
        for _ in 0..40 {
            field.step(Extent::new(200.0, 100.0), FAR, &mut rec);
        }
        let p = field.particles()[0];
        assert!(p.pos.x > 100.0);
        assert_eq!(p.vel.x, 0.25);

        // Shrunk again: reflects off the new edge
        let stats = field.step(Extent::new(100.0, 100.0), FAR, &mut rec);
        assert_eq!(stats.reflections, 1);
        assert_eq!(field.particles()[0].vel.x, -0.25);
    }

    #[test]
    fn shrink_traps_particles_until_regrow() {
        let mut field = ParticleField::from_particles(vec![
            Particle::new(Vec2::new(300.0, 50.0), Vec2::new(0.25, 0.0)),
        ]);
        let mut rec = Recorder::default();
        let small = Extent::new(100.0, 100.0);

        // Far outside the new bound: flips every frame, never comes back in
        for _ in 0..1_000 {
            let stats = field.step(small, FAR, &mut rec);
            assert_eq!(stats.reflections, 1);
            let x = field.particles()[0].pos.x;
            assert!(x > 299.0 && x < 301.0);
        }
        rec.ops.clear();

        // Growing past it releases the particle
        let big = Extent::new(400.0, 100.0);
        for _ in 0..10 {
            let stats = field.step(big, FAR, &mut rec);
            assert_eq!(stats.reflections, 0);
        }
        let p = field.particles()[0];
        assert_eq!(p.vel.x.abs(), 0.25);
        assert!(p.pos.x > 297.0 && p.pos.x < 303.0);
    }
}
