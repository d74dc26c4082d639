use std::fmt;

use chrono::NaiveDateTime;
use healthtracker_types::profile::UserProfile;

use crate::helpers::format_hms::FormatHMS;

/// Live state of a running workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutSession {
    pub start_time: NaiveDateTime,
    pub elapsed_seconds: i64,
    pub step_estimate: u64,
    pub calories: f64,
    pub last_heart_rate: u16,
}

impl WorkoutSession {
    fn new(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            elapsed_seconds: 0,
            step_estimate: 0,
            calories: 0.0,
            last_heart_rate: 0,
        }
    }
}

impl fmt::Display for WorkoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Heart Rate: {} BPM | Steps: {} | Calories: {:.0} kcal | Duration: {}",
            self.last_heart_rate,
            self.step_estimate,
            self.calories,
            self.elapsed_seconds.format_hms()
        )
    }
}

/// Keytel-style heart-rate calorie estimate over the whole elapsed duration.
///
/// The duration is divided by 4.184 rather than converted to minutes; the
/// result is kept as-is so stored history stays comparable.
pub fn calories(profile: &UserProfile, heart_rate: u16, duration_seconds: i64) -> f64 {
    if duration_seconds <= 0 {
        return 0.0;
    }

    let age = f64::from(profile.age_years);
    let weight = f64::from(profile.weight_kg);
    let heart_rate = f64::from(heart_rate);

    ((age * 0.2017) + (weight * 0.09036) + (heart_rate * 0.6309) - 55.0969)
        * (duration_seconds as f64 / 4.184)
}

/// Accumulates workout statistics from a stream of heart-rate ticks.
///
/// The engine is `Idle` until [`start`](Self::start) and `Running` until
/// [`stop`](Self::stop). It holds no locks; callers feeding it from more than
/// one source must serialize the calls themselves.
#[derive(Debug, Default)]
pub struct WorkoutMetricsEngine {
    profile: UserProfile,
    session: Option<WorkoutSession>,
}

impl WorkoutMetricsEngine {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            session: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a fresh session. Does nothing if one is already running.
    pub fn start(&mut self, now: NaiveDateTime) {
        if self.session.is_none() {
            self.session = Some(WorkoutSession::new(now));
        }
    }

    /// Feeds one heart-rate sample. Ignored while idle.
    pub fn tick(&mut self, heart_rate: u16, now: NaiveDateTime) -> Option<&WorkoutSession> {
        let profile = self.profile;
        let session = self.session.as_mut()?;

        let elapsed = (now - session.start_time).num_seconds().max(0);
        session.elapsed_seconds = session.elapsed_seconds.max(elapsed);
        session.step_estimate += u64::from(heart_rate / 3);
        session.last_heart_rate = heart_rate;
        session.calories = calories(&profile, heart_rate, session.elapsed_seconds);

        Some(session)
    }

    /// Ends the running session and hands back its final state.
    pub fn stop(&mut self) -> Option<WorkoutSession> {
        self.session.take()
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    pub fn elapsed_seconds(&self) -> i64 {
        self.session.map(|s| s.elapsed_seconds).unwrap_or_default()
    }

    pub fn step_estimate(&self) -> u64 {
        self.session.map(|s| s.step_estimate).unwrap_or_default()
    }

    pub fn calories(&self) -> f64 {
        self.session.map(|s| s.calories).unwrap_or_default()
    }

    pub fn last_heart_rate(&self) -> u16 {
        self.session.map(|s| s.last_heart_rate).unwrap_or_default()
    }
}
