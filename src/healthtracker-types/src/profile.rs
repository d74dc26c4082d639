use serde::{Deserialize, Serialize};

/// User-supplied body parameters for the calorie estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: u32,
    pub age_years: u32,
}

impl UserProfile {
    pub const DEFAULT_WEIGHT_KG: u32 = 70;
    pub const DEFAULT_AGE_YEARS: u32 = 25;

    pub fn new(weight_kg: Option<u32>, age_years: Option<u32>) -> Self {
        Self {
            weight_kg: weight_kg.unwrap_or(Self::DEFAULT_WEIGHT_KG),
            age_years: age_years.unwrap_or(Self::DEFAULT_AGE_YEARS),
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let profile = UserProfile::default();
        assert_eq!(profile.weight_kg, 70);
        assert_eq!(profile.age_years, 25);
    }

    #[test]
    fn keeps_supplied_values() {
        let profile = UserProfile::new(Some(82), None);
        assert_eq!(profile.weight_kg, 82);
        assert_eq!(profile.age_years, 25);
    }
}
