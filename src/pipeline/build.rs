// src/pipeline/build.rs

//! Render the archive into a static site with an external generator.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::models::SiteConfig;
use crate::pipeline::transform::run_transform;
use crate::utils::log::Progress;

/// Build the site described by `site`.
///
/// The archive is transformed into a scratch directory, handed to
/// `{generator} build <scratch> --dest <output> [--config <file>]`, and the
/// scratch directory is removed whether or not the generator succeeds.
pub async fn run_build(site: &SiteConfig, progress: Progress) -> Result<()> {
    progress.header("Site Build");

    let scratch = scratch_dir(&site.output_dir);
    remove_dir_if_exists(&scratch).await?;

    progress.step(1, 2, "Transforming archive");
    let summary = run_transform(&site.source_dir, &scratch, progress).await?;

    progress.step(2, 2, &format!("Running {}", site.generator));
    remove_dir_if_exists(&site.output_dir).await?;
    let built = generate(site, &scratch).await;

    if let Err(e) = remove_dir_if_exists(&scratch).await {
        log::warn!("Failed to remove {}: {}", scratch.display(), e);
    }
    built?;

    progress.summary(
        "Site built",
        &[
            ("Problems", summary.problems.to_string()),
            ("Output", site.output_dir.display().to_string()),
        ],
    );
    Ok(())
}

async fn generate(site: &SiteConfig, source: &Path) -> Result<()> {
    let mut command = Command::new(&site.generator);
    command
        .arg("build")
        .arg(source)
        .arg("--dest")
        .arg(&site.output_dir);
    if let Some(config) = &site.generator_config {
        command.arg("--config").arg(config);
    }

    log::debug!("Running {:?}", command);
    let status = command
        .status()
        .await
        .map_err(|e| AppError::site(format!("failed to run {}: {}", site.generator, e)))?;

    if !status.success() {
        return Err(AppError::site(format!(
            "{} exited with {}",
            site.generator, status
        )));
    }
    Ok(())
}

/// `site` → `.site-source` next to it.
fn scratch_dir(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("site");
    output.with_file_name(format!(".{name}-source"))
}

async fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Io(e)),
    }
}
