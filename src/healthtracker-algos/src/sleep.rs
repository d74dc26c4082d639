use healthtracker_types::sleep::{SleepPhases, SleepRecord};
use rand::Rng;

pub struct SleepScoreCalculator;

impl SleepScoreCalculator {
    const DEEP_WEIGHT: f64 = 0.4;
    const LIGHT_WEIGHT: f64 = 0.3;
    const REM_WEIGHT: f64 = 0.2;
    const AWAKE_PENALTY: f64 = 0.5;

    /// Weighted phase sum, truncated toward zero. Not clamped: enough awake
    /// time drives the score below zero.
    pub fn score(phases: &SleepPhases) -> i32 {
        let score = f64::from(phases.deep_minutes) * Self::DEEP_WEIGHT
            + f64::from(phases.light_minutes) * Self::LIGHT_WEIGHT
            + f64::from(phases.rem_minutes) * Self::REM_WEIGHT
            - f64::from(phases.awake_minutes) * Self::AWAKE_PENALTY;

        score as i32
    }

    pub fn record(phases: SleepPhases) -> SleepRecord {
        SleepRecord {
            score: Self::score(&phases),
            phases,
        }
    }
}

/// Fabricated phase durations for exercising the sleep flow without a
/// staging-capable device.
pub fn simulated_phases<R: Rng + ?Sized>(rng: &mut R) -> SleepPhases {
    SleepPhases {
        deep_minutes: rng.random_range(60..150),
        light_minutes: rng.random_range(90..210),
        rem_minutes: rng.random_range(30..90),
        awake_minutes: rng.random_range(5..25),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(deep: u32, light: u32, rem: u32, awake: u32) -> SleepPhases {
        SleepPhases {
            deep_minutes: deep,
            light_minutes: light,
            rem_minutes: rem,
            awake_minutes: awake,
        }
    }

    #[test]
    fn weighted_score() {
        assert_eq!(SleepScoreCalculator::score(&phases(80, 100, 40, 10)), 65);
    }

    #[test]
    fn truncates_fractional_scores() {
        // 1*0.4 + 1*0.3 + 1*0.2 = 0.9
        assert_eq!(SleepScoreCalculator::score(&phases(1, 1, 1, 0)), 0);
        // 10*0.4 + 3*0.3 = 4.9
        assert_eq!(SleepScoreCalculator::score(&phases(10, 3, 0, 0)), 4);
    }

    #[test]
    fn truncates_toward_zero_when_negative() {
        // 1*0.4 - 3*0.5 = -1.1
        assert_eq!(SleepScoreCalculator::score(&phases(1, 0, 0, 3)), -1);
    }

    #[test]
    fn long_awake_time_goes_negative() {
        assert_eq!(SleepScoreCalculator::score(&phases(0, 0, 0, 200)), -100);
    }

    #[test]
    fn empty_night_scores_zero() {
        assert_eq!(SleepScoreCalculator::score(&SleepPhases::default()), 0);
    }

    #[test]
    fn record_keeps_phases() {
        let record = SleepScoreCalculator::record(phases(80, 100, 40, 10));
        assert_eq!(record.phases.deep_minutes, 80);
        assert_eq!(record.score, 65);
    }

    #[test]
    fn simulated_phases_stay_in_range() {
        let mut rng = rand::rng();
        for _ in 0..1_000 {
            let p = simulated_phases(&mut rng);
            assert!((60..150).contains(&p.deep_minutes));
            assert!((90..210).contains(&p.light_minutes));
            assert!((30..90).contains(&p.rem_minutes));
            assert!((5..25).contains(&p.awake_minutes));
        }
    }
}
