//! Piano roll interaction engine.
//!
//! Pointer events flow through here in one direction: a raw canvas point is
//! interpreted musically ([`geometry`]), the press/drag/release state machine
//! picks the next mode ([`mouse`]), and the reducer decides what the event
//! does to the pattern ([`reduce`]), using note hit-testing ([`lookup`]) and
//! the snapping and clipping rules ([`grid`]). [`RollEditor`] ties these
//! together for a host.

pub mod geometry;
pub mod grid;
pub mod lookup;
pub mod mouse;
pub mod reduce;
mod session;

pub use geometry::{Camera, MusicalPoint, ScreenPoint, ScreenRect};
pub use mouse::{InteractionMode, PointerEvent, PointerKind, RawPointerEvent};
pub use reduce::{EditDefaults, EditOutcome};
pub use session::RollEditor;
