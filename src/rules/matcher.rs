//! Read-only rule preview over historical journals
//!
//! The matcher pages through candidates newest first and evaluates one
//! rule's triggers against each. It never executes actions. The scan ends
//! when the window is exhausted, when `search_limit` candidates have been
//! examined, when `trigger_limit` matches were found, or at the deadline.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::debug;

use super::ledger::{JournalCollector, JournalQuery};
use super::processor::rule_matches;
use super::report::{MatchReport, ScanEnd};
use crate::error::RulesResult;
use crate::models::Rule;

pub const DEFAULT_SEARCH_LIMIT: usize = 200;
pub const DEFAULT_TRIGGER_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 5000;
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Bounds for one matcher scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Restrict to journals touching these accounts (names or ids)
    pub accounts: Vec<String>,
    pub search_limit: usize,
    pub trigger_limit: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            accounts: Vec::new(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            trigger_limit: DEFAULT_TRIGGER_LIMIT,
        }
    }
}

impl MatchParams {
    pub fn with_limits(mut self, search_limit: usize, trigger_limit: usize) -> Self {
        self.search_limit = search_limit;
        self.trigger_limit = trigger_limit;
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<String>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Clamp both limits into `1..=max`
    pub fn clamped(mut self, max: usize) -> Self {
        let max = max.max(1);
        self.search_limit = self.search_limit.clamp(1, max);
        self.trigger_limit = self.trigger_limit.clamp(1, max);
        self
    }

    fn query(&self) -> JournalQuery {
        JournalQuery::new()
            .accounts(self.accounts.clone())
            .date_range(self.start, self.end)
    }
}

/// Previews which journals a rule would match
pub struct TransactionMatcher<'a> {
    collector: &'a dyn JournalCollector,
    max_limit: usize,
    page_size: usize,
    deadline: Option<Instant>,
}

impl<'a> TransactionMatcher<'a> {
    pub fn new(collector: &'a dyn JournalCollector) -> Self {
        Self {
            collector,
            max_limit: MAX_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            deadline: None,
        }
    }

    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Scan for journals the rule matches.
    ///
    /// Only collector failures are errors; hitting a limit is a normal end.
    pub fn find_matches(&self, rule: &Rule, params: MatchParams) -> RulesResult<MatchReport> {
        let params = params.clamped(self.max_limit);
        let query = params.query();

        let mut matched = Vec::new();
        let mut examined = 0usize;
        let mut offset = 0usize;

        let end = 'scan: loop {
            if examined >= params.search_limit {
                break ScanEnd::SearchLimit;
            }
            if self.deadline.map_or(false, |d| Instant::now() >= d) {
                break ScanEnd::Deadline;
            }

            let size = self.page_size.min(params.search_limit - examined);
            let page = self.collector.page(&query, offset, size)?;
            if page.is_empty() {
                break ScanEnd::Exhausted;
            }
            let page_len = page.len();
            offset += page_len;

            for journal in page {
                examined += 1;
                if rule_matches(rule, &journal) {
                    matched.push(journal);
                    if matched.len() >= params.trigger_limit {
                        break 'scan ScanEnd::TriggerLimit;
                    }
                }
            }

            if page_len < size {
                break ScanEnd::Exhausted;
            }
        };

        debug!(
            rule = %rule,
            examined,
            matched = matched.len(),
            end = %end,
            "Matcher scan finished"
        );

        Ok(MatchReport {
            rule_id: rule.id,
            matched,
            examined,
            end,
        })
    }
}
