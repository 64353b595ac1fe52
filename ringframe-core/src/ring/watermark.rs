//! Fill-level threshold detection

/// Fill level relative to the configured watermarks
///
/// Detection only. Reacting to a crossing (asserting RTS, pausing a
/// sender) is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatermarkState {
    /// `count >= high_watermark`
    High,
    /// `count <= low_watermark`
    Low,
    /// Between the two thresholds
    Normal,
}

impl WatermarkState {
    /// Classify a fill level
    ///
    /// High wins when the thresholds overlap.
    pub const fn classify(count: usize, high: usize, low: usize) -> Self {
        if count >= high {
            WatermarkState::High
        } else if count <= low {
            WatermarkState::Low
        } else {
            WatermarkState::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_between_thresholds() {
        assert_eq!(WatermarkState::classify(4, 6, 2), WatermarkState::Normal);
        assert_eq!(WatermarkState::classify(6, 6, 2), WatermarkState::High);
        assert_eq!(WatermarkState::classify(2, 6, 2), WatermarkState::Low);
        assert_eq!(WatermarkState::classify(0, 6, 2), WatermarkState::Low);
    }

    #[test]
    fn test_overlapping_thresholds_prefer_high() {
        // low above high: a count of 3 satisfies both
        assert_eq!(WatermarkState::classify(3, 2, 5), WatermarkState::High);
    }
}
