use serde::{Deserialize, Serialize};

pub const MAX_SLEEP_MINUTES: u32 = 59;
pub const MAX_HEALTH_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub heart_rate: u32,
    pub steps: u32,
    pub sleep_hours: u32,
    pub sleep_minutes: u32,
    pub health_score: u32,
}

impl Default for HealthMetrics {
    fn default() -> Self {
        Self {
            heart_rate: 72,
            steps: 6532,
            sleep_hours: 7,
            sleep_minutes: 45,
            health_score: 85,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthMetricsPatch {
    pub heart_rate: Option<u32>,
    pub steps: Option<u32>,
    pub sleep_hours: Option<u32>,
    pub sleep_minutes: Option<u32>,
    pub health_score: Option<u32>,
}

impl HealthMetrics {
    /// Field-by-field merge. Minutes and score are clamped into their ranges.
    pub fn merged(mut self, patch: HealthMetricsPatch) -> Self {
        if let Some(heart_rate) = patch.heart_rate {
            self.heart_rate = heart_rate;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(sleep_hours) = patch.sleep_hours {
            self.sleep_hours = sleep_hours;
        }
        if let Some(sleep_minutes) = patch.sleep_minutes {
            self.sleep_minutes = sleep_minutes.min(MAX_SLEEP_MINUTES);
        }
        if let Some(health_score) = patch.health_score {
            self.health_score = health_score.min(MAX_HEALTH_SCORE);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_untouched_fields() {
        let merged = HealthMetrics::default().merged(HealthMetricsPatch {
            steps: Some(10_000),
            ..Default::default()
        });
        assert_eq!(merged.steps, 10_000);
        assert_eq!(merged.heart_rate, 72);
        assert_eq!(merged.sleep_minutes, 45);
    }

    #[test]
    fn merge_clamps_ranges() {
        let merged = HealthMetrics::default().merged(HealthMetricsPatch {
            sleep_minutes: Some(75),
            health_score: Some(140),
            ..Default::default()
        });
        assert_eq!(merged.sleep_minutes, 59);
        assert_eq!(merged.health_score, 100);
    }
}
