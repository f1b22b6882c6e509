pub mod rep;

pub use rep::{RepTracker, TrackerState, Transition};
