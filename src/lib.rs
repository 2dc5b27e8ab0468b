//! IoU-based multi-object tracking.
//!
//! Feed per-frame detection sets into a [`Tracker`] and get back stable
//! track identities maintained through a predict → associate → update →
//! lifecycle cycle: constant-velocity prediction, minimum-cost bipartite
//! matching on 1 − IoU with gating, and a Tentative/Confirmed/Deleted track
//! state machine. The detector and any rendering stay outside; the tracker
//! is pure in-memory computation.

pub mod sort;

pub use sort::bbox::Bbox;
pub use sort::detection::Detection;
pub use sort::error::TrackingError;
pub use sort::linear_assignment::{AssignmentSolver, HungarianSolver};
pub use sort::preprocessing::non_max_suppression;
pub use sort::track::TrackState;
pub use sort::tracker::{TrackSnapshot, Tracker, TrackerConfig};
