//! Ordered collection of scan results, gated as a whole

use super::severity::Severity;
use super::types::ScanResult;

/// Results of several scans, in the order they were added
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResultSet {
    results: Vec<ScanResult>,
}

impl ScanResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ScanResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanResult> {
        self.results.iter()
    }

    /// True if any member fails `threshold`; an empty set never fails
    pub fn any_failed(&self, threshold: &str) -> bool {
        let threshold = Severity::from_label(threshold);
        self.results.iter().any(|result| result.failed_at(threshold))
    }

    /// True if any member fails the threshold in its own settings
    pub fn any_failed_configured(&self) -> bool {
        self.results.iter().any(ScanResult::failed_configured)
    }

    /// Members failing `threshold`
    pub fn failed_results<'a>(
        &'a self,
        threshold: &str,
    ) -> impl Iterator<Item = &'a ScanResult> + 'a {
        let threshold = Severity::from_label(threshold);
        self.results
            .iter()
            .filter(move |result| result.failed_at(threshold))
    }

    /// Findings across all members
    pub fn total_count(&self) -> u64 {
        self.results
            .iter()
            .map(ScanResult::total_count)
            .fold(0u64, u64::saturating_add)
    }
}

impl From<Vec<ScanResult>> for ScanResultSet {
    fn from(results: Vec<ScanResult>) -> Self {
        Self { results }
    }
}

impl FromIterator<ScanResult> for ScanResultSet {
    fn from_iter<I: IntoIterator<Item = ScanResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ScanResultSet {
    type Item = ScanResult;
    type IntoIter = std::vec::IntoIter<ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanResultSet {
    type Item = &'a ScanResult;
    type IntoIter = std::slice::Iter<'a, ScanResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
