/// Events emitted by the page runtime.
/// The main loop consumes these for logging and schedule control.

use crate::domain::countdown::TimeLeft;
use crate::domain::geom::Extent;

#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    CountdownChanged(TimeLeft),
    CountdownExpired,
    Resized(Extent),
    Unmounted,
}
