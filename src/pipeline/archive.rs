// src/pipeline/archive.rs

//! Writes resolved submissions into the local archive.
//!
//! ```text
//! leetcode/
//! ├── README.md                 # stats card + problem table
//! └── 1. Two Sum/
//!     ├── README.md             # statement as markdown
//!     ├── NOTE.md               # personal note
//!     ├── two-sum.rs            # one file per language
//!     └── two-sum.cpp
//! ```

use std::path::{Path, PathBuf};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::models::{BestMap, CachedSubmission, Config, Problem, SubmissionDetail};
use crate::services::RemoteClient;
use crate::utils::log::Progress;
use crate::utils::markdown::html_to_markdown;
use crate::utils::retry::RetryPolicy;
use crate::utils::{encode_uri, folder_name, lang, readable_memory};

const STATS_CARD_BASE: &str = "https://leetcode.card.workers.dev/?username=";

/// Rendering options for the archive.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub output_dir: PathBuf,
    /// Judge base URL, for problem and profile links
    pub base_url: String,
    pub timezone: Tz,
    /// Write bare code without the metadata header
    pub pure: bool,
}

impl ArchiveOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            output_dir: config.paths.output_dir.clone(),
            base_url: config.client.base_url.trim_end_matches('/').to_string(),
            timezone: config.archive.timezone()?,
            pure: config.archive.pure,
        })
    }
}

/// What one archive pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub problems: usize,
    pub solutions: usize,
    pub details_fetched: usize,
}

/// One row of the root README table.
#[derive(Debug, Clone)]
struct TableRow {
    number: u64,
    title: String,
    difficulty: String,
    tags: String,
    solutions: Vec<String>,
}

impl TableRow {
    fn render(&self) -> String {
        format!(
            "| {} | {} | {} | {} |",
            self.title,
            self.difficulty,
            self.tags,
            self.solutions.join(" \\| ")
        )
    }
}

/// Materializes a [`BestMap`] on disk.
pub struct ArchiveWriter<'a> {
    client: &'a dyn RemoteClient,
    retry: &'a RetryPolicy,
    options: ArchiveOptions,
    progress: Progress,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(
        client: &'a dyn RemoteClient,
        retry: &'a RetryPolicy,
        options: ArchiveOptions,
        progress: Progress,
    ) -> Self {
        Self {
            client,
            retry,
            options,
            progress,
        }
    }

    /// Write every problem in `best`, then the root README for `username`.
    ///
    /// Problem metadata is fetched once per problem. Submission detail is
    /// fetched only for entries that are not cached, or whose file has gone
    /// missing from the archive.
    pub async fn write(&self, best: &BestMap, username: &str) -> Result<ArchiveSummary> {
        tokio::fs::create_dir_all(&self.options.output_dir).await?;

        let mut summary = ArchiveSummary::default();
        let mut rows = Vec::with_capacity(best.len());
        let total = best.len();

        for (index, (slug, langs)) in best.iter().enumerate() {
            let problem = self
                .retry
                .run(&format!("question {slug}"), || self.client.problem(slug))
                .await?;

            let folder = folder_name(&problem.question_frontend_id, &problem.title);
            let dir = self.options.output_dir.join(&folder);
            tokio::fs::create_dir_all(&dir).await?;

            self.write_statement(&dir, &problem).await?;

            let mut solutions = Vec::with_capacity(langs.len());
            for (lang_name, entry) in langs {
                let file_name = format!("{}{}", slug, lang::extension(lang_name));
                let path = dir.join(&file_name);

                if entry.cached && path.exists() {
                    log::debug!("{} [{}] already archived", slug, lang_name);
                } else {
                    if entry.cached {
                        log::warn!(
                            "{} missing from archive, downloading again",
                            path.display()
                        );
                    }
                    let id = entry.submission.id;
                    let detail = self
                        .retry
                        .run(&format!("submission {id}"), || {
                            self.client.submission_detail(id)
                        })
                        .await?;
                    summary.details_fetched += 1;

                    let body = self.render_solution(&problem, lang_name, entry, &detail)?;
                    tokio::fs::write(&path, body).await?;
                }

                solutions.push(format!(
                    "[{}]({})",
                    lang_name,
                    encode_uri(&format!("./{}/{}", folder, file_name))
                ));
                summary.solutions += 1;
            }
            solutions.sort();

            self.progress.step(
                index + 1,
                total,
                &format!(
                    "{} [{}]",
                    problem.display_title(),
                    langs.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            );

            rows.push(TableRow {
                number: problem.number(),
                title: format!(
                    "[{}](./{}) [🔗]({}/problems/{}/)",
                    problem.display_title(),
                    encode_uri(&folder),
                    self.options.base_url,
                    slug
                ),
                difficulty: problem.difficulty.clone(),
                tags: problem.tag_line(),
                solutions,
            });
            summary.problems += 1;
        }

        rows.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.title.cmp(&b.title)));
        let readme = self.render_index(username, &rows);
        tokio::fs::write(self.options.output_dir.join("README.md"), readme).await?;

        Ok(summary)
    }

    async fn write_statement(&self, dir: &Path, problem: &Problem) -> Result<()> {
        let content = problem
            .content
            .as_deref()
            .map(html_to_markdown)
            .unwrap_or_default();
        let readme = format!(
            "# {}\n\nTags: {}\n\n{}",
            problem.display_title(),
            problem.tag_line(),
            content
        );
        tokio::fs::write(dir.join("README.md"), readme).await?;
        tokio::fs::write(dir.join("NOTE.md"), problem.note.as_deref().unwrap_or("")).await?;
        Ok(())
    }

    fn render_solution(
        &self,
        problem: &Problem,
        lang_name: &str,
        entry: &CachedSubmission,
        detail: &SubmissionDetail,
    ) -> Result<String> {
        if self.options.pure {
            return Ok(detail.code.clone());
        }

        let solved = DateTime::from_timestamp(entry.submission.timestamp, 0)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "submission {} has invalid timestamp {}",
                    entry.submission.id, entry.submission.timestamp
                ))
            })?
            .with_timezone(&self.options.timezone);

        let comment = lang::comment(lang_name);
        Ok(format!(
            "{c} {title} ({date})\n{c} Runtime: {rt} ms ({rtp:.2}%) Memory: {mem} ({memp:.2}%) \n\n{code}",
            c = comment,
            title = problem.display_title(),
            date = solved.format("%Y-%m-%d"),
            rt = detail.runtime,
            rtp = detail.runtime_percentile,
            mem = readable_memory(detail.memory),
            memp = detail.memory_percentile,
            code = detail.code,
        ))
    }

    fn render_index(&self, username: &str, rows: &[TableRow]) -> String {
        let table = rows
            .iter()
            .map(TableRow::render)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "\n# LeetCode Solutions\n\n\
             [![LeetCode Stats Card]({card}{user})]({base}/{user}/)\n\n\
             | Problem | Difficulty | Tags | Solution |\n\
             | ------- | ---------- | ---- | -------- |\n\
             {table}\n",
            card = STATS_CARD_BASE,
            user = username,
            base = self.options.base_url,
            table = table,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fake::{FakeJudge, accepted, problem};
    use std::time::Duration;
    use tempfile::TempDir;

    fn options(dir: &Path, pure: bool) -> ArchiveOptions {
        ArchiveOptions {
            output_dir: dir.to_path_buf(),
            base_url: "https://leetcode.com".to_string(),
            timezone: chrono_tz::Asia::Taipei,
            pure,
        }
    }

    fn judge() -> FakeJudge {
        FakeJudge::new(vec![])
            .with_problem(problem("1", "Two Sum", "two-sum"))
            .with_problem(problem("15", "3Sum", "3sum"))
            .with_problem(problem("2", "Add Two Numbers", "add-two-numbers"))
    }

    fn retry() -> RetryPolicy {
        RetryPolicy::new(1, Duration::ZERO)
    }

    #[tokio::test]
    async fn writes_problem_folder_and_solution_header() {
        let tmp = TempDir::new().unwrap();
        let judge = judge();
        let retry = retry();
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(accepted(7, "two-sum", "rust", 4)));

        let writer = ArchiveWriter::new(&judge, &retry, options(tmp.path(), false), Progress::silent());
        let summary = writer.write(&best, "alice").await.unwrap();

        assert_eq!(summary.problems, 1);
        assert_eq!(summary.details_fetched, 1);

        let dir = tmp.path().join("1. Two Sum");
        let readme = std::fs::read_to_string(dir.join("README.md")).unwrap();
        assert!(readme.starts_with("# 1. Two Sum\n\nTags: `Array`\n\n"));
        assert!(readme.contains("Solve `two-sum`."));
        assert_eq!(
            std::fs::read_to_string(dir.join("NOTE.md")).unwrap(),
            "note for two-sum"
        );

        let code = std::fs::read_to_string(dir.join("two-sum.rs")).unwrap();
        let mut lines = code.lines();
        assert_eq!(lines.next().unwrap(), "// 1. Two Sum (2023-11-15)");
        assert_eq!(
            lines.next().unwrap(),
            "// Runtime: 4 ms (90.50%) Memory: 42.10 MB (12.25%) "
        );
        assert_eq!(lines.next().unwrap(), "");
        assert_eq!(lines.next().unwrap(), "solve(7)");
    }

    #[tokio::test]
    async fn pure_mode_writes_bare_code() {
        let tmp = TempDir::new().unwrap();
        let judge = judge();
        let retry = retry();
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(accepted(7, "two-sum", "python3", 4)));

        let writer = ArchiveWriter::new(&judge, &retry, options(tmp.path(), true), Progress::silent());
        writer.write(&best, "alice").await.unwrap();

        let code = std::fs::read_to_string(tmp.path().join("1. Two Sum/two-sum.py")).unwrap();
        assert_eq!(code, "solve(7)");
    }

    #[tokio::test]
    async fn cached_entries_are_not_downloaded_again() {
        let tmp = TempDir::new().unwrap();
        let judge = judge();
        let retry = retry();
        let dir = tmp.path().join("1. Two Sum");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("two-sum.rs"), "old").unwrap();

        let mut best = BestMap::new();
        best.offer(CachedSubmission::from_cache(accepted(7, "two-sum", "rust", 4)));
        best.offer(CachedSubmission::fresh(accepted(8, "two-sum", "cpp", 4)));
        best.offer(CachedSubmission::from_cache(accepted(9, "3sum", "rust", 4)));

        let writer = ArchiveWriter::new(&judge, &retry, options(tmp.path(), false), Progress::silent());
        let summary = writer.write(&best, "alice").await.unwrap();

        // 3sum is cached but its file is gone, so it is fetched again
        assert_eq!(judge.detail_calls(), vec![9, 8]);
        assert_eq!(summary.details_fetched, 2);
        assert_eq!(std::fs::read_to_string(dir.join("two-sum.rs")).unwrap(), "old");
    }

    #[tokio::test]
    async fn index_is_sorted_numerically_with_all_solutions() {
        let tmp = TempDir::new().unwrap();
        let judge = judge();
        let retry = retry();
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(accepted(1, "3sum", "rust", 4)));
        best.offer(CachedSubmission::fresh(accepted(2, "two-sum", "rust", 4)));
        best.offer(CachedSubmission::fresh(accepted(3, "two-sum", "cpp", 4)));
        best.offer(CachedSubmission::fresh(accepted(4, "add-two-numbers", "golang", 4)));

        let writer = ArchiveWriter::new(&judge, &retry, options(tmp.path(), false), Progress::silent());
        writer.write(&best, "alice").await.unwrap();

        let index = std::fs::read_to_string(tmp.path().join("README.md")).unwrap();
        assert!(index.contains(
            "[![LeetCode Stats Card](https://leetcode.card.workers.dev/?username=alice)](https://leetcode.com/alice/)"
        ));

        let rows: Vec<&str> = index.lines().filter(|l| l.starts_with("| [")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with(
            "| [1. Two Sum](./1.%20Two%20Sum) [🔗](https://leetcode.com/problems/two-sum/) | Easy | `Array` |"
        ));
        assert!(rows[0].ends_with(
            "[cpp](./1.%20Two%20Sum/two-sum.cpp) \\| [rust](./1.%20Two%20Sum/two-sum.rs) |"
        ));
        assert!(rows[1].starts_with("| [2. Add Two Numbers]"));
        assert!(rows[2].starts_with("| [15. 3Sum]"));
    }

    #[tokio::test]
    async fn missing_problem_aborts() {
        let tmp = TempDir::new().unwrap();
        let judge = judge();
        let retry = retry();
        let mut best = BestMap::new();
        best.offer(CachedSubmission::fresh(accepted(1, "unknown", "rust", 4)));

        let writer = ArchiveWriter::new(&judge, &retry, options(tmp.path(), false), Progress::silent());
        assert!(writer.write(&best, "alice").await.is_err());
        assert!(!tmp.path().join("README.md").exists());
    }
}
