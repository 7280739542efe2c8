use std::path::Path;
use std::process::Command;

use gmirror_core::error::MirrorError;

/// Something that can produce a bare mirror of a remote repo.
pub trait CloneBackend: Send + Sync {
    /// Mirror-clone `url` into `workdir/base`, running from `workdir`.
    fn mirror_clone(&self, url: &str, base: &str, workdir: &Path) -> Result<(), MirrorError>;
}

/// Clones by shelling out to the git executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

/// Arguments for a bare, submodule-following mirror clone.
pub fn mirror_clone_args<'a>(url: &'a str, base: &'a str) -> [&'a str; 5] {
    ["clone", "--mirror", "--recursive", url, base]
}

impl CloneBackend for GitCli {
    fn mirror_clone(&self, url: &str, base: &str, workdir: &Path) -> Result<(), MirrorError> {
        let args = mirror_clone_args(url, base);
        tracing::info!(
            "running: {} {} (in {})",
            self.program,
            args.join(" "),
            workdir.display()
        );

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| MirrorError::Clone {
                name: base.to_string(),
                message: format!("failed to run {}: {e}", self.program),
            })?;

        if !output.status.success() {
            return Err(MirrorError::Clone {
                name: base.to_string(),
                message: format!(
                    "{} clone exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}
