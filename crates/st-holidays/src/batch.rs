//! Per-item outcomes of cache warm-up and refresh, and their summary.

/// What happened to one `(country, year)` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Fetched and cached.
    Success,
    /// Nothing to do (already cached, or not near expiry).
    Skipped,
    /// Fetch or store failed.
    Failed(String),
}

/// One key and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// Cache key, `"{COUNTRY}:{YEAR}"`.
    pub key: String,
    /// Outcome.
    pub outcome: BatchOutcome,
}

impl BatchItem {
    /// Shorthand constructor.
    pub fn new(key: impl Into<String>, outcome: BatchOutcome) -> Self {
        Self {
            key: key.into(),
            outcome,
        }
    }
}

/// A failed key and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    /// Cache key.
    pub key: String,
    /// Failure description.
    pub message: String,
}

/// Counts over a batch of [`BatchItem`]s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Keys fetched and cached.
    pub success: usize,
    /// Keys that failed.
    pub failed: usize,
    /// Keys left alone.
    pub skipped: usize,
    /// One entry per failed key.
    pub errors: Vec<BatchError>,
}

impl BatchSummary {
    /// Keys refreshed, for summaries produced by a refresh.
    pub fn refreshed(&self) -> usize {
        self.success
    }

    /// Total keys considered.
    pub fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }
}

impl FromIterator<BatchItem> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = BatchItem>>(items: I) -> Self {
        let mut summary = BatchSummary::default();
        for item in items {
            match item.outcome {
                BatchOutcome::Success => summary.success += 1,
                BatchOutcome::Skipped => summary.skipped += 1,
                BatchOutcome::Failed(message) => {
                    summary.failed += 1;
                    summary.errors.push(BatchError {
                        key: item.key,
                        message,
                    });
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let summary: BatchSummary = vec![
            BatchItem::new("US:2024", BatchOutcome::Success),
            BatchItem::new("GB:2024", BatchOutcome::Skipped),
            BatchItem::new("FR:2024", BatchOutcome::Failed("timeout".into())),
            BatchItem::new("DE:2024", BatchOutcome::Success),
        ]
        .into_iter()
        .collect();
        assert_eq!(summary.success, 2);
        assert_eq!(summary.refreshed(), 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
        assert_eq!(
            summary.errors,
            vec![BatchError {
                key: "FR:2024".into(),
                message: "timeout".into()
            }]
        );
    }
}
