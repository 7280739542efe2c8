use std::path::Path;

use chrono::Utc;
use indicatif::ProgressBar;

use gmirror_core::catalog::{MirrorTarget, RepoMap};
use gmirror_core::config::FailurePolicy;
use gmirror_core::error::MirrorError;

use crate::git_ops::CloneBackend;
use crate::report::{MirrorOutcome, MirrorRecord, MirrorReport};

/// Mirrors a catalog into a local directory tree, one repo at a time.
pub struct MirrorEngine<B> {
    backend: B,
    policy: FailurePolicy,
    progress: ProgressBar,
}

impl<B: CloneBackend> MirrorEngine<B> {
    pub fn new(backend: B, policy: FailurePolicy) -> Self {
        Self {
            backend,
            policy,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on `pb`; its length is set by `mirror_all`.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = pb;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ensure every repo in `repos` has a bare mirror under `root`.
    ///
    /// Flow, per repo:
    /// 1. Create the parent directory
    /// 2. Skip if anything exists at `<parent>/<base>.git`
    /// 3. Otherwise mirror-clone from the parent directory
    ///
    /// Directory creation failures are returned as errors. Clone failures are
    /// recorded in the report; under [`FailurePolicy::Abort`] no further repos
    /// are attempted.
    pub fn mirror_all(&self, root: &Path, repos: &RepoMap) -> Result<MirrorReport, MirrorError> {
        let mut report = MirrorReport::new();
        self.progress.set_length(repos.len() as u64);

        for (name, clone_url) in repos {
            self.progress.set_message(name.clone());
            let outcome = self.mirror_one(root, name, clone_url)?;
            self.progress.inc(1);

            let failed = matches!(outcome, MirrorOutcome::Failed(_));
            report.records.push(MirrorRecord {
                name: name.clone(),
                clone_url: clone_url.clone(),
                outcome,
            });

            if failed && self.policy == FailurePolicy::Abort {
                tracing::warn!("aborting after failed clone of {name}");
                break;
            }
        }

        self.progress.finish_and_clear();
        report.finished_at = Utc::now();
        Ok(report)
    }

    fn mirror_one(
        &self,
        root: &Path,
        name: &str,
        clone_url: &str,
    ) -> Result<MirrorOutcome, MirrorError> {
        let target = MirrorTarget::for_name(root, name)?;

        std::fs::create_dir_all(&target.parent).map_err(|source| MirrorError::Filesystem {
            path: target.parent.clone(),
            source,
        })?;

        // Existence only: an empty or broken directory still counts as mirrored.
        if std::fs::symlink_metadata(target.path()).is_ok() {
            tracing::debug!("{name}: {} exists, skipping", target.path().display());
            return Ok(MirrorOutcome::Skipped);
        }

        match self
            .backend
            .mirror_clone(clone_url, &target.base, &target.parent)
        {
            Ok(()) => Ok(MirrorOutcome::Cloned),
            Err(e) => {
                tracing::error!("{name}: {e}");
                Ok(MirrorOutcome::Failed(e.to_string()))
            }
        }
    }
}
