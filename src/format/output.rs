use chrono::{DateTime, Utc};
use serde::Serialize;
use unifi_dump::ScanLimits;

use crate::config::FailurePolicy;

/// Per-collection counters, in order of first selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub name: String,
    pub records: usize,
    pub failed: usize,
}

/// Summary of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub dump: String,
    pub policy: FailurePolicy,
    pub dry_run: bool,
    pub limits: ScanLimits,
    /// Lines read, including selectors.
    pub lines: usize,
    pub selectors: usize,
    pub records: usize,
    pub imported: usize,
    pub failed: usize,
    pub collections: Vec<CollectionStats>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportReport {
    #[must_use]
    pub fn new(dump: impl Into<String>, policy: FailurePolicy, limits: ScanLimits) -> Self {
        let now = Utc::now();
        Self {
            dump: dump.into(),
            policy,
            dry_run: false,
            limits,
            lines: 0,
            selectors: 0,
            records: 0,
            imported: 0,
            failed: 0,
            collections: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Index of the stats entry for `name`, created on first use.
    pub fn collection_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.collections.iter().position(|c| c.name == name) {
            return idx;
        }
        self.collections.push(CollectionStats {
            name: name.to_string(),
            records: 0,
            failed: 0,
        });
        self.collections.len() - 1
    }

    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionStats> {
        self.collections.iter().find(|c| c.name == name)
    }
}
