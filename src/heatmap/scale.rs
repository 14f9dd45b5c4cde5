use serde::{Deserialize, Serialize};

use super::RenderOptions;

/// Floor for the auto-scale supremum so a handful of small values does not
/// immediately saturate the palette.
pub const MIN_SUPREMUM: i64 = 5;

/// Which proportional mapping to use when no valid thresholds are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoScale {
    /// `value * levels / sup`.
    Linear,
    /// Zero is always level 0; positive values spread over `1..levels`.
    #[default]
    ZeroReserved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalePolicy {
    AutoLinear,
    AutoZeroReserved,
    /// Ascending thresholds, one fewer than the number of levels.
    Threshold(Vec<i64>),
}

impl ScalePolicy {
    /// Thresholds win when there are exactly `colors.len() - 1` of them;
    /// anything else silently falls back to the configured auto-scale.
    pub fn select(options: &RenderOptions) -> Self {
        match &options.value_ranges {
            Some(ranges) if ranges.len() + 1 == options.colors.len() => {
                Self::Threshold(ranges.clone())
            }
            _ => match options.auto_scale {
                AutoScale::Linear => Self::AutoLinear,
                AutoScale::ZeroReserved => Self::AutoZeroReserved,
            },
        }
    }
}

/// Maps bucket values to color indices in `0..levels`.
#[derive(Debug, Clone)]
pub struct LevelScaler {
    policy: ScalePolicy,
    levels: usize,
    sup: i64,
}

impl LevelScaler {
    /// `max` is the largest bucket value that will be drawn.
    pub fn new(policy: ScalePolicy, levels: usize, max: i64) -> Self {
        Self {
            policy,
            levels: levels.max(1),
            sup: MIN_SUPREMUM.max(max.saturating_add(1)),
        }
    }

    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn level(&self, value: i64) -> usize {
        let top = self.levels as i64 - 1;
        if top == 0 {
            return 0;
        }
        let level = match &self.policy {
            ScalePolicy::Threshold(ranges) => ranges
                .iter()
                .position(|&threshold| threshold > value)
                .map_or(top, |i| i as i64),
            ScalePolicy::AutoLinear => value.max(0).saturating_mul(self.levels as i64) / self.sup,
            // Multiplier is `top` (colors - 1): {0, 1, 10} over five colors
            // must land on levels 0, 1, 4.
            ScalePolicy::AutoZeroReserved => {
                if value <= 0 {
                    0
                } else if self.sup <= 1 {
                    1
                } else {
                    ((value - 1).saturating_mul(top) / (self.sup - 1) + 1).clamp(1, top)
                }
            }
        };
        level.clamp(0, top) as usize
    }
}
