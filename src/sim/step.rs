/// Per-frame and per-tick updates of a mounted page.
///
/// `frame()` runs at the display cadence and draws straight onto the surface.
/// `tick()` runs once per second and only touches the countdown, whose
/// observable state is what the renderer watches for text changes.

use crate::domain::countdown::TickOutcome;
use crate::domain::field::{FrameStats, Surface};
use crate::domain::geom::Extent;
use crate::sim::event::PageEvent;
use crate::sim::world::PageState;

/// Advance and draw one frame. `None` once the page is unmounted.
pub fn frame<S: Surface + ?Sized>(page: &mut PageState, surface: &mut S) -> Option<FrameStats> {
    if !page.is_mounted() {
        return None;
    }
    let extent = page.extent;
    let pointer = page.pointer;
    page.field.as_mut().map(|field| field.step(extent, pointer, surface))
}

/// Recompute the countdown.
pub fn tick(page: &mut PageState, now_ms: i64) -> Vec<PageEvent> {
    let mut events = Vec::new();
    if !page.is_mounted() {
        return events;
    }
    match page.countdown.tick(now_ms) {
        TickOutcome::Updated(true) => {
            events.push(PageEvent::CountdownChanged(page.countdown.time_left()));
        }
        TickOutcome::Expired => events.push(PageEvent::CountdownExpired),
        TickOutcome::Updated(false) | TickOutcome::Stopped => {}
    }
    events
}

/// Apply a surface resize. Only future reflection bounds change.
pub fn resize(page: &mut PageState, extent: Extent) -> Vec<PageEvent> {
    if page.extent == extent {
        return Vec::new();
    }
    page.resize(extent);
    vec![PageEvent::Resized(extent)]
}

/// Tear the page down.
pub fn unmount(page: &mut PageState) -> Vec<PageEvent> {
    if !page.is_mounted() {
        return Vec::new();
    }
    page.unmount();
    vec![PageEvent::Unmounted]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::countdown::{TimeLeft, DAY_MS};
    use crate::domain::geom::Vec2;
    use crate::sim::world::DeadlineSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const T0: i64 = 1_700_000_000_000;

    #[derive(Default)]
    struct Counter {
        clears: usize,
        circles: usize,
    }

    impl Surface for Counter {
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _alpha: f32) {
            self.circles += 1;
        }
        fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _alpha: f32) {}
    }

    fn mounted(deadline: DeadlineSource) -> PageState {
        let mut rng = StdRng::seed_from_u64(11);
        PageState::mount(Extent::new(1280.0, 720.0), T0, deadline, &mut rng)
    }

    #[test]
    fn frame_draws_all_particles() {
        let mut page = mounted(DeadlineSource::Window);
        let mut surface = Counter::default();
        let stats = frame(&mut page, &mut surface).unwrap();
        assert_eq!(stats.pair_checks, 4950);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.circles, 100);
    }

    #[test]
    fn unmounted_page_stops_drawing_and_ticking() {
        let mut page = mounted(DeadlineSource::Window);
        assert_eq!(unmount(&mut page), vec![PageEvent::Unmounted]);
        assert!(unmount(&mut page).is_empty());

        let mut surface = Counter::default();
        assert!(frame(&mut page, &mut surface).is_none());
        assert_eq!(surface.clears, 0);
        assert!(tick(&mut page, T0 + 1_000).is_empty());
    }

    #[test]
    fn tick_publishes_changes_then_expiry() {
        let mut page = mounted(DeadlineSource::Fixed(T0 + 1_500));
        assert_eq!(
            tick(&mut page, T0 + 1_000),
            vec![PageEvent::CountdownChanged(TimeLeft::ZERO)]
        );
        assert_eq!(
            tick(&mut page, T0 + 2_000),
            vec![PageEvent::CountdownExpired]
        );
        assert!(tick(&mut page, T0 + 3_000).is_empty());
    }

    #[test]
    fn window_deadline_is_a_day_from_mount() {
        let page = mounted(DeadlineSource::Window);
        assert_eq!(page.countdown.deadline_ms(), T0 + DAY_MS);
    }

    #[test]
    fn resize_keeps_particles() {
        let mut page = mounted(DeadlineSource::Window);
        let before: Vec<Vec2> = page.field.as_ref().unwrap().particles().iter().map(|p| p.pos).collect();
        let events = resize(&mut page, Extent::new(640.0, 360.0));
        assert_eq!(events, vec![PageEvent::Resized(Extent::new(640.0, 360.0))]);
        let after: Vec<Vec2> = page.field.as_ref().unwrap().particles().iter().map(|p| p.pos).collect();
        assert_eq!(before, after);
        assert!(resize(&mut page, Extent::new(640.0, 360.0)).is_empty());
    }

    #[test]
    fn pointer_is_last_value_wins() {
        let mut page = mounted(DeadlineSource::Window);
        page.set_pointer(Vec2::new(1.0, 1.0));
        page.set_pointer(Vec2::new(5.0, 9.0));
        assert_eq!(page.pointer, Vec2::new(5.0, 9.0));
    }
}
