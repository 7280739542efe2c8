use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

use gmirror_core::catalog::filter_by_name;
use gmirror_core::config::{host_dest_dir, FailurePolicy, MirrorConfig};
use gmirror_core::error::MirrorError;
use gmirror_host::{CatalogSource, GitilesLister};
use gmirror_sync::{GitCli, MirrorEngine};

use crate::summary;

#[derive(Parser, Debug)]
#[command(
    name = "gmirror",
    version,
    about = "Mirror every repository of a Gitiles host as bare clones"
)]
pub struct MirrorArgs {
    /// Gitiles host URL, e.g. https://gerrit.googlesource.com/
    pub url: String,
    /// Destination directory; mirrors land in <dest>/<host>/
    #[arg(long)]
    pub dest: PathBuf,
    /// Only clone repos whose name contains the given substring
    #[arg(long)]
    pub name: Option<String>,
    /// Config file (defaults to ~/.gmirror/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Keep cloning after a failed repo and report all failures at the end
    #[arg(long)]
    pub keep_going: bool,
    /// Git executable to clone with
    #[arg(long)]
    pub git: Option<String>,
}

impl MirrorArgs {
    /// Resolve the effective config: file (or defaults), then flag overrides.
    pub fn resolve_config(&self) -> Result<MirrorConfig, MirrorError> {
        let mut config = match &self.config {
            Some(path) => MirrorConfig::load_from(path)?,
            None => MirrorConfig::load()?,
        };
        if self.keep_going {
            config.on_failure = FailurePolicy::Continue;
        }
        if let Some(git) = &self.git {
            config.git_program = git.clone();
        }
        Ok(config)
    }
}

pub async fn run(args: MirrorArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).map_err(|e| MirrorError::InvalidUrl {
        url: args.url.clone(),
        message: e.to_string(),
    })?;
    let config = args.resolve_config()?;
    let dest_dir = host_dest_dir(&args.dest, &url)?;

    let lister = GitilesLister::new(url, &config.user_agent)?;
    let mut repos = lister.list_repos().await?;

    if let Some(pattern) = args.name.as_deref().filter(|p| !p.is_empty()) {
        repos = filter_by_name(repos, pattern);
        tracing::info!("{} repos match {pattern:?}", repos.len());
    }

    println!(
        "Mirroring {} repos into {} (on failure: {})",
        repos.len(),
        dest_dir.display(),
        config.on_failure
    );

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{pos}/{len}] {msg}",
    )?);

    let engine = MirrorEngine::new(GitCli::new(config.git_program), config.on_failure)
        .with_progress(pb);
    let report =
        tokio::task::spawn_blocking(move || engine.mirror_all(&dest_dir, &repos)).await??;

    summary::print(&report);
    report.into_result()?;
    Ok(())
}
