use std::fmt;

use serde::{Deserialize, Serialize};

/// A finished workout as stored in history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: i32,
    pub duration_seconds: i64,
    pub steps: i64,
    pub heart_rate: u16,
    pub calories: f64,
}

impl fmt::Display for WorkoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duration: {} s, Steps: {}, Heart Rate: {} BPM, Calories: {:.0} kcal",
            self.duration_seconds, self.steps, self.heart_rate, self.calories
        )
    }
}
