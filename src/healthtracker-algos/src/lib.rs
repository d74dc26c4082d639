pub(crate) mod workout;
pub use workout::{WorkoutMetricsEngine, WorkoutSession, calories};

pub(crate) mod sleep;
pub use sleep::{SleepScoreCalculator, simulated_phases};

pub mod helpers;
