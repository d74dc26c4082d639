use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes spent in each sleep phase during one tracking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPhases {
    pub deep_minutes: u32,
    pub light_minutes: u32,
    pub rem_minutes: u32,
    pub awake_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(flatten)]
    pub phases: SleepPhases,
    pub score: i32,
}

/// A sleep record as stored, with the row id assigned by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub id: i32,
    #[serde(flatten)]
    pub record: SleepRecord,
}

impl fmt::Display for SleepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deep: {} min, Light: {} min, REM: {} min, Awake: {} min, Score: {}",
            self.phases.deep_minutes,
            self.phases.light_minutes,
            self.phases.rem_minutes,
            self.phases.awake_minutes,
            self.score
        )
    }
}
