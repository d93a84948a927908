use crate::error::AnalyzerError;
use crate::parser;
use std::collections::HashMap;

/// Per-key counter that remembers the order in which keys were first seen.
///
/// First-seen order is the tiebreak for every ranking below, so two runs over
/// the same file always rank equal counts the same way.
#[derive(Debug, Default)]
struct Tally<'a> {
    entries: Vec<(&'a str, usize)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    fn bump(&mut self, key: &'a str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }
}

/// Count lines per source address, highest count first.
///
/// Only the first address on a line is counted. Equal counts keep the order
/// in which the addresses first appear in the log.
pub fn count_requests_per_address<S: AsRef<str>>(lines: &[S]) -> Vec<(String, usize)> {
    let mut tally = Tally::default();
    for line in lines {
        if let Some(address) = parser::extract_address(line.as_ref()) {
            tally.bump(address);
        }
    }

    let mut ranked = tally.entries;
    // Stable sort: ties stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .map(|(address, count)| (address.to_string(), count))
        .collect()
}

/// Find the endpoint requested most often.
///
/// Ties go to the endpoint that appears first in the log. Fails with
/// [`AnalyzerError::EmptyResult`] when no line carries a quoted HTTP request.
pub fn most_accessed_endpoint<S: AsRef<str>>(
    lines: &[S],
) -> Result<(String, usize), AnalyzerError> {
    let mut tally = Tally::default();
    for line in lines {
        if let Some(endpoint) = parser::extract_endpoint(line.as_ref()) {
            tally.bump(endpoint);
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(endpoint, count) in &tally.entries {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((endpoint, count)),
        }
    }

    best.map(|(endpoint, count)| (endpoint.to_string(), count))
        .ok_or(AnalyzerError::EmptyResult)
}

/// Count `401` responses per source address.
pub fn detect_failed_logins<S: AsRef<str>>(lines: &[S]) -> HashMap<String, usize> {
    let mut failed: HashMap<String, usize> = HashMap::new();
    for line in lines {
        let line = line.as_ref();
        let Some(address) = parser::extract_address(line) else {
            continue;
        };
        if parser::extract_status(line) == Some("401") {
            *failed.entry(address.to_string()).or_insert(0) += 1;
        }
    }
    failed
}

/// Keep only addresses whose failed-login count is strictly above `threshold`.
pub fn filter_suspicious(
    failed_logins: &HashMap<String, usize>,
    threshold: u64,
) -> HashMap<String, usize> {
    failed_logins
        .iter()
        .filter(|(_, &count)| count as u64 > threshold)
        .map(|(address, &count)| (address.clone(), count))
        .collect()
}

/// All aggregates for one run, computed once from the full line set.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub total_lines: usize,
    pub lines_with_address: usize,
    pub requests_per_address: Vec<(String, usize)>,
    most_accessed: Option<(String, usize)>,
    pub failed_logins: HashMap<String, usize>,
}

impl Analysis {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let requests_per_address = count_requests_per_address(lines);
        let most_accessed = match most_accessed_endpoint(lines) {
            Ok(found) => Some(found),
            Err(err) => {
                tracing::debug!(error = %err, "no endpoint found in any line");
                None
            }
        };
        let failed_logins = detect_failed_logins(lines);
        let lines_with_address: usize = requests_per_address.iter().map(|(_, c)| c).sum();

        tracing::debug!(
            total_lines = lines.len(),
            lines_with_address,
            addresses = requests_per_address.len(),
            failed_login_addresses = failed_logins.len(),
            "analysis complete"
        );

        Self {
            total_lines: lines.len(),
            lines_with_address,
            requests_per_address,
            most_accessed,
            failed_logins,
        }
    }

    /// The most accessed endpoint, or `EmptyResult` when the log had none.
    pub fn most_accessed_endpoint(&self) -> Result<(&str, usize), AnalyzerError> {
        self.most_accessed
            .as_ref()
            .map(|(endpoint, count)| (endpoint.as_str(), *count))
            .ok_or(AnalyzerError::EmptyResult)
    }

    pub fn suspicious(&self, threshold: u64) -> HashMap<String, usize> {
        filter_suspicious(&self.failed_logins, threshold)
    }
}
