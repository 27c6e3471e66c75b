// src/pipeline/dump.rs

//! The dump run: resolve best submissions, archive them, persist the cache.

use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::archive::{ArchiveOptions, ArchiveSummary, ArchiveWriter};
use crate::pipeline::resolve::BestSubmissionResolver;
use crate::services::RemoteClient;
use crate::storage::SubmissionCache;
use crate::utils::log::Progress;
use crate::utils::retry::RetryPolicy;

const TOTAL_STEPS: usize = 5;

/// Outcome of a successful dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpReport {
    pub username: String,
    pub submissions: usize,
    pub archive: ArchiveSummary,
}

/// Run a full dump.
///
/// The submission cache is written last, so a run that fails anywhere
/// leaves the previous cache in place.
pub async fn run_dump(
    config: &Config,
    client: &dyn RemoteClient,
    cache: &dyn SubmissionCache,
    clean: bool,
    progress: Progress,
) -> Result<DumpReport> {
    let started = Instant::now();
    let retry = RetryPolicy::from_config(&config.retry);
    let options = ArchiveOptions::from_config(config)?;

    progress.header("LeetCode Dump");

    progress.step(1, TOTAL_STEPS, "Checking session");
    let user = retry.run("user status", || client.whoami()).await?;
    if !user.is_signed_in {
        return Err(AppError::auth(
            "session is not signed in (expired or invalid LEETCODE_SESSION)",
        ));
    }
    progress.success(&format!("Signed in as {}", user.username));

    progress.step(2, TOTAL_STEPS, "Loading cache");
    if clean {
        clean_output(config, cache).await?;
    }
    let state = cache.load().await?;
    progress.sub_item(&format!(
        "{} cached submissions, {} skipped, high-water mark {}",
        state.submissions.len(),
        state.skip.len(),
        state.high_water_mark()
    ));

    progress.step(3, TOTAL_STEPS, "Scanning submissions");
    let resolver = BestSubmissionResolver::from_config(&config.resolver);
    let page_size = resolver.page_size();
    let best = resolver
        .resolve(state.submissions, &state.skip, |offset| {
            retry.run("submission list", move || {
                client.list_submissions(offset, page_size)
            })
        })
        .await?;
    progress.success(&format!(
        "Scan done ({} problems, {} to download)",
        best.len(),
        best.pending_count()
    ));

    progress.step(4, TOTAL_STEPS, "Dumping submissions");
    let writer = ArchiveWriter::new(client, &retry, options, progress);
    let archive = writer.write(&best, &user.username).await?;
    progress.success(&format!(
        "Archive written to {}",
        config.paths.output_dir.display()
    ));

    progress.step(5, TOTAL_STEPS, "Saving cache");
    cache.save(&best).await?;

    let report = DumpReport {
        username: user.username,
        submissions: best.submission_count(),
        archive,
    };

    progress.summary(
        "Dump complete",
        &[
            ("Problems", report.archive.problems.to_string()),
            ("Solutions", report.archive.solutions.to_string()),
            ("Downloaded", report.archive.details_fetched.to_string()),
            ("Elapsed", format!("{:.1}s", started.elapsed().as_secs_f64())),
        ],
    );

    Ok(report)
}

/// Remove the archive and forget the cached submissions, so that every
/// solution is downloaded again. The skip list survives.
async fn clean_output(config: &Config, cache: &dyn SubmissionCache) -> Result<()> {
    let output = &config.paths.output_dir;
    match tokio::fs::remove_dir_all(output).await {
        Ok(()) => log::info!("Removed {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(AppError::Io(e)),
    }
    cache.reset().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SkipConfig, Submission};
    use crate::pipeline::fake::{FakeJudge, accepted, problem};
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.output_dir = tmp.path().join("leetcode");
        config.paths.state_dir = tmp.path().join("state");
        config.retry.cooldown_ms = 0;
        config.resolver.page_size = 2;
        config
    }

    fn judge(history: Vec<Submission>) -> FakeJudge {
        FakeJudge::new(history)
            .with_problem(problem("1", "Two Sum", "two-sum"))
            .with_problem(problem("15", "3Sum", "3sum"))
    }

    #[tokio::test]
    async fn second_run_downloads_only_new_submissions() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let cache = LocalStorage::new(&config.paths.state_dir);

        let first = judge(vec![
            accepted(3, "two-sum", "rust", 8),
            accepted(2, "3sum", "rust", 8),
            accepted(1, "two-sum", "cpp", 8),
        ]);
        let report = run_dump(&config, &first, &cache, false, Progress::silent())
            .await
            .unwrap();
        assert_eq!(report.username, "alice");
        assert_eq!(report.archive.details_fetched, 3);

        let second = judge(vec![
            accepted(5, "two-sum", "rust", 2),
            accepted(4, "3sum", "rust", 99),
            accepted(3, "two-sum", "rust", 8),
            accepted(2, "3sum", "rust", 8),
            accepted(1, "two-sum", "cpp", 8),
        ]);
        let report = run_dump(&config, &second, &cache, false, Progress::silent())
            .await
            .unwrap();

        assert_eq!(second.detail_calls(), vec![5]);
        assert_eq!(report.submissions, 3);

        let code = std::fs::read_to_string(
            config.paths.output_dir.join("1. Two Sum").join("two-sum.rs"),
        )
        .unwrap();
        assert!(code.ends_with("solve(5)"));

        let third = judge(vec![
            accepted(5, "two-sum", "rust", 2),
            accepted(4, "3sum", "rust", 99),
        ]);
        run_dump(&config, &third, &cache, false, Progress::silent())
            .await
            .unwrap();
        assert!(third.detail_calls().is_empty());
    }

    #[tokio::test]
    async fn signed_out_session_is_an_auth_error() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let cache = LocalStorage::new(&config.paths.state_dir);
        let judge = judge(vec![]).signed_out();

        let err = run_dump(&config, &judge, &cache, false, Progress::silent())
            .await
            .unwrap_err();
        assert!(err.is_auth());
        assert!(!config.paths.output_dir.exists());
    }

    #[tokio::test]
    async fn transient_listing_failures_are_retried() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let cache = LocalStorage::new(&config.paths.state_dir);
        let judge = judge(vec![accepted(1, "two-sum", "rust", 8)]).failing_listings(2);

        let report = run_dump(&config, &judge, &cache, false, Progress::silent())
            .await
            .unwrap();
        assert_eq!(report.archive.problems, 1);
    }

    #[tokio::test]
    async fn failed_run_keeps_previous_cache() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let cache = LocalStorage::new(&config.paths.state_dir);

        let first = judge(vec![accepted(1, "two-sum", "rust", 8)]);
        run_dump(&config, &first, &cache, false, Progress::silent())
            .await
            .unwrap();
        let saved = std::fs::read(config.paths.state_dir.join("submissions.json")).unwrap();

        // 3 attempts, 3 failures
        let broken = judge(vec![accepted(2, "two-sum", "rust", 1)]).failing_listings(3);
        assert!(
            run_dump(&config, &broken, &cache, false, Progress::silent())
                .await
                .is_err()
        );

        let after = std::fs::read(config.paths.state_dir.join("submissions.json")).unwrap();
        assert_eq!(saved, after);
    }

    #[tokio::test]
    async fn clean_redownloads_everything_and_keeps_skip_list() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let cache = LocalStorage::new(&config.paths.state_dir);
        let history = vec![
            accepted(3, "two-sum", "rust", 1),
            accepted(2, "two-sum", "cpp", 1),
            accepted(1, "3sum", "rust", 1),
        ];

        run_dump(&config, &judge(history.clone()), &cache, false, Progress::silent())
            .await
            .unwrap();
        std::fs::write(config.paths.output_dir.join("stray.txt"), "x").unwrap();
        let skip = serde_json::to_vec(&SkipConfig { skip: vec![3] }).unwrap();
        std::fs::write(config.paths.state_dir.join("skip.json"), &skip).unwrap();

        let again = judge(history);
        let report = run_dump(&config, &again, &cache, true, Progress::silent())
            .await
            .unwrap();

        assert_eq!(again.detail_calls(), vec![1, 2]);
        assert_eq!(report.submissions, 2);
        assert!(!config.paths.output_dir.join("stray.txt").exists());
        assert_eq!(
            std::fs::read(config.paths.state_dir.join("skip.json")).unwrap(),
            skip
        );
    }

    #[tokio::test]
    async fn invalid_timezone_fails_before_any_request() {
        let tmp = TempDir::new().unwrap();
        let mut config = config(&tmp);
        config.archive.timezone = "Mars/Olympus".to_string();
        let cache = LocalStorage::new(&config.paths.state_dir);
        let judge = judge(vec![accepted(1, "two-sum", "rust", 8)]);

        let result = run_dump(&config, &judge, &cache, false, Progress::silent()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(judge.list_offsets.lock().unwrap().is_empty());
    }
}
