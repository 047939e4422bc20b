/// PageState: everything the landing page owns while it is on screen.
///
/// Created by `mount()` once the terminal surface is known, mutated by the
/// main loop only, released by `unmount()`. Nothing here is global.
///
///   - `extent`   written on resize, read by reflection checks
///   - `pointer`  written on mouse move (last value wins), read per frame
///   - `field`    advanced and drawn every frame
///   - `countdown` recomputed by the one-second interval

use rand::Rng;

use crate::domain::countdown::{Countdown, DEFAULT_WINDOW};
use crate::domain::field::ParticleField;
use crate::domain::geom::{Extent, Vec2};

/// Where the countdown's deadline comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeadlineSource {
    /// Fresh 24 hour window from mount time.
    Window,
    /// Fixed absolute deadline, epoch milliseconds.
    Fixed(i64),
}

pub struct PageState {
    pub extent: Extent,
    pub pointer: Vec2,
    pub field: Option<ParticleField>,
    pub countdown: Countdown,
    mounted: bool,
}

impl PageState {
    pub fn mount<R: Rng + ?Sized>(extent: Extent, now_ms: i64, deadline: DeadlineSource, rng: &mut R) -> Self {
        let countdown = match deadline {
            DeadlineSource::Window => Countdown::starting_at(now_ms, DEFAULT_WINDOW),
            DeadlineSource::Fixed(at) => Countdown::with_deadline(at, now_ms),
        };
        PageState {
            extent,
            pointer: Vec2::ZERO,
            field: Some(ParticleField::spawn(extent, rng)),
            countdown,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    /// New bounds for future reflections. Particles keep their positions.
    pub fn resize(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Drop the particle set. Further frames are no-ops.
    pub fn unmount(&mut self) {
        self.field = None;
        self.mounted = false;
    }
}
