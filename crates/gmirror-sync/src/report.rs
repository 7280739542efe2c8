use chrono::{DateTime, Utc};

use gmirror_core::error::MirrorError;

/// What happened to one repo during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// A fresh mirror was cloned.
    Cloned,
    /// Something already existed at the target path.
    Skipped,
    /// The clone backend failed.
    Failed(String),
}

impl std::fmt::Display for MirrorOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MirrorOutcome::Cloned => write!(f, "cloned"),
            MirrorOutcome::Skipped => write!(f, "skipped"),
            MirrorOutcome::Failed(_) => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MirrorRecord {
    pub name: String,
    pub clone_url: String,
    pub outcome: MirrorOutcome,
}

/// Per-repo results of one mirroring run, in processing order.
///
/// Repos that were never attempted (after an aborting failure) have no record.
#[derive(Debug, Clone)]
pub struct MirrorReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records: Vec<MirrorRecord>,
}

impl MirrorReport {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            records: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&MirrorOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn cloned_count(&self) -> usize {
        self.count(|o| *o == MirrorOutcome::Cloned)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| *o == MirrorOutcome::Skipped)
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, MirrorOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// `Ok` when every attempted repo succeeded, otherwise the first failure.
    pub fn into_result(self) -> Result<Self, MirrorError> {
        let first_failure = self.records.iter().find_map(|r| match &r.outcome {
            MirrorOutcome::Failed(message) => Some(MirrorError::Clone {
                name: r.name.clone(),
                message: message.clone(),
            }),
            _ => None,
        });
        match first_failure {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

impl Default for MirrorReport {
    fn default() -> Self {
        Self::new()
    }
}
