use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`Comparator`](crate::Comparator).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Options for the extracted-text comparison.
    pub text: TextDiffOptions,
    /// Options for table matching and classification.
    pub tables: MatchOptions,
    /// Top-level record keys the structural differ skips.
    pub ignored_fields: Vec<String>,
}

/// Options for the extracted-text comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDiffOptions {
    /// Maximum number of unified diff lines kept in the report.
    pub max_diff_lines: usize,
    /// Unchanged lines shown around each change.
    pub context_lines: usize,
    /// Budget for the character-level similarity diff, in milliseconds.
    /// Past it the ratio is approximate.
    pub timeout_ms: u64,
}

impl TextDiffOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for TextDiffOptions {
    fn default() -> Self {
        Self {
            max_diff_lines: 200,
            context_lines: 0,
            timeout_ms: 5_000,
        }
    }
}

/// How tables of doc1 are paired with tables of doc2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Each doc1 table, in order, takes its best unused doc2 table.
    #[default]
    Greedy,
    /// Maximum total score assignment. Not compatible with greedy pairings.
    Optimal,
}

/// Options for table matching and classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Weight of header overlap in the pair score.
    pub header_weight: f64,
    /// Weight of body row overlap in the pair score.
    pub row_weight: f64,
    /// A pair is matched only if its score exceeds this.
    pub match_threshold: f64,
    /// Flattened cell overlap above which a pair is similar-content.
    pub similar_content_threshold: f64,
    /// Maximum number of diff lines kept for a diverged pair.
    pub max_diff_lines: usize,
    pub strategy: MatchStrategy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            header_weight: 0.7,
            row_weight: 0.3,
            match_threshold: 0.5,
            similar_content_threshold: 0.7,
            max_diff_lines: 100,
            strategy: MatchStrategy::Greedy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CompareConfig::default();
        assert_eq!(c.text.max_diff_lines, 200);
        assert_eq!(c.text.context_lines, 0);
        assert_eq!(c.text.timeout(), Duration::from_secs(5));
        assert_eq!(c.tables.match_threshold, 0.5);
        assert_eq!(c.tables.similar_content_threshold, 0.7);
        assert_eq!(c.tables.max_diff_lines, 100);
        assert_eq!(c.tables.strategy, MatchStrategy::Greedy);
        assert!(c.ignored_fields.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: CompareConfig = toml::from_str(
            r#"
            ignored_fields = ["id", "fileName"]

            [tables]
            strategy = "optimal"
            "#,
        )
        .unwrap();
        assert_eq!(c.ignored_fields, vec!["id", "fileName"]);
        assert_eq!(c.tables.strategy, MatchStrategy::Optimal);
        assert_eq!(c.tables.header_weight, 0.7);
        assert_eq!(c.text.max_diff_lines, 200);
    }
}
