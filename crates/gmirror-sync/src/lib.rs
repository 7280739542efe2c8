pub mod engine;
pub mod git_ops;
pub mod report;

pub use engine::MirrorEngine;
pub use git_ops::{CloneBackend, GitCli};
pub use report::{MirrorOutcome, MirrorRecord, MirrorReport};
