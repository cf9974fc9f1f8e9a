//! Drawing style: placement modes, the value snapshot, and the push/pop stack.

mod modes;
mod snapshot;
mod stack;

pub use modes::{ArcMode, PlacementMode, StrokeCap, StrokeJoin};
pub use snapshot::{SphereDetail, StyleSnapshot, Toggle};
pub use stack::{DEFAULT_DEPTH, StyleStack};
