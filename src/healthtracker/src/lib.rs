#[macro_use]
extern crate log;

mod device;
pub use device::{RingDevice, ScanTarget, scan};

mod tracker;
pub use tracker::{TrackerEvent, WorkoutTracker, request_stop, stop_after};
