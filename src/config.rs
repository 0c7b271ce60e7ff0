use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Tuning knobs for one analysis engine.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// service configs. Defaults reproduce the reference behavior: 10-word
/// minimum segments, 0.6 similarity threshold, batches of 3 segments with a
/// 2 s pause between batches, 5 candidates kept per segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Segments with fewer words than this are discarded as unanalyzable.
    #[serde(default = "AnalysisConfig::default_min_segment_words")]
    pub min_segment_words: usize,
    /// Pairs scoring below this never become matches.
    #[serde(default = "AnalysisConfig::default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Number of segments looked up per retrieval batch.
    #[serde(default = "AnalysisConfig::default_batch_size")]
    pub batch_size: usize,
    /// Pause between successive batches, to respect external rate limits.
    /// Not applied between providers within one batch.
    #[serde(default = "AnalysisConfig::default_batch_delay_ms")]
    pub batch_delay_ms: u64,
    /// Cap on merged candidates kept per segment after dedup.
    #[serde(default = "AnalysisConfig::default_max_results")]
    pub max_results: usize,
}

impl AnalysisConfig {
    pub(crate) fn default_min_segment_words() -> usize {
        10
    }

    pub(crate) fn default_similarity_threshold() -> f64 {
        0.6
    }

    pub(crate) fn default_batch_size() -> usize {
        3
    }

    pub(crate) fn default_batch_delay_ms() -> u64 {
        2_000
    }

    pub(crate) fn default_max_results() -> usize {
        5
    }

    pub fn with_min_segment_words(mut self, words: usize) -> Self {
        self.min_segment_words = words;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Validate the configuration before the engine accepts it.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.min_segment_words == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_segment_words must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AnalysisError::InvalidConfig(
                "similarity_threshold must be within [0.0, 1.0]".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(AnalysisError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_segment_words: Self::default_min_segment_words(),
            similarity_threshold: Self::default_similarity_threshold(),
            batch_size: Self::default_batch_size(),
            batch_delay_ms: Self::default_batch_delay_ms(),
            max_results: Self::default_max_results(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.min_segment_words, 10);
        assert_eq!(cfg.batch_size, 3);
        assert_eq!(cfg.batch_delay(), Duration::from_secs(2));
    }

    #[test]
    fn zero_min_segment_words_rejected() {
        let cfg = AnalysisConfig::default().with_min_segment_words(0);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(
            matches!(err, AnalysisError::InvalidConfig(msg) if msg.contains("min_segment_words"))
        );
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let cfg = AnalysisConfig::default().with_similarity_threshold(1.5);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(
            matches!(err, AnalysisError::InvalidConfig(msg) if msg.contains("similarity_threshold"))
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").expect("empty config parses");
        assert_eq!(cfg, AnalysisConfig::default());
    }
}
