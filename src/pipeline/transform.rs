// src/pipeline/transform.rs

//! Archive → static site source.
//!
//! Each problem folder becomes `<slug>/index.md` holding the statement, every
//! solution as a fenced block, and the note. The root README is copied with
//! its relative links pointed at the new slugs.

use std::path::Path;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};

use crate::error::{AppError, Result};
use crate::utils::log::Progress;
use crate::utils::site_slug;

static RELATIVE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\(\./([^)\s]+)\)").expect("link pattern is valid"));

/// What a transform produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub problems: usize,
}

/// Transform the archive at `source` into a site tree at `output`.
///
/// `output` must not exist yet.
pub async fn run_transform(
    source: &Path,
    output: &Path,
    progress: Progress,
) -> Result<TransformSummary> {
    log::debug!("Transform {} -> {}", source.display(), output.display());

    if !tokio::fs::try_exists(source).await? {
        return Err(AppError::site(format!("{} does not exist", source.display())));
    }
    if tokio::fs::try_exists(output).await? {
        return Err(AppError::site(format!("{} already exists", output.display())));
    }

    tokio::fs::create_dir_all(output).await?;

    let index = tokio::fs::read_to_string(source.join("README.md")).await?;
    tokio::fs::write(output.join("README.md"), rewrite_links(&index)).await?;

    let mut problems = Vec::new();
    let mut entries = tokio::fs::read_dir(source).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            problems.push(entry.path());
        }
    }
    problems.sort();
    log::info!("{} problems found in {}", problems.len(), source.display());

    for dir in &problems {
        let Some(folder) = dir.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping non UTF-8 directory {}", dir.display());
            continue;
        };
        let slug = site_slug(folder);
        let doc = render_doc(dir, folder).await?;

        let target = output.join(&slug);
        tokio::fs::create_dir_all(&target).await?;
        tokio::fs::write(target.join("index.md"), doc).await?;
        progress.sub_item(&format!("{} → {}/index.md", folder, slug));
    }

    progress.success(&format!(
        "Transformed {} problems into {}",
        problems.len(),
        output.display()
    ));

    Ok(TransformSummary {
        problems: problems.len(),
    })
}

/// Point `./<folder>` links at `./<slug>` and `./<folder>/<file>.<ext>`
/// links at the `#<ext>` anchor of the slug page.
fn rewrite_links(index: &str) -> String {
    RELATIVE_LINK
        .replace_all(index, |caps: &Captures| {
            let target = percent_decode_str(&caps[1]).decode_utf8_lossy();
            match target.split_once('/') {
                Some((folder, file)) => {
                    let ext = file.rsplit_once('.').map_or("", |(_, ext)| ext);
                    format!("](./{}/#{})", site_slug(folder), ext)
                }
                None => format!("](./{})", site_slug(&target)),
            }
        })
        .into_owned()
}

async fn render_doc(dir: &Path, title: &str) -> Result<String> {
    let statement = tokio::fs::read_to_string(dir.join("README.md")).await?;
    let note = match tokio::fs::read_to_string(dir.join("NOTE.md")).await {
        Ok(note) => note,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(AppError::Io(e)),
    };

    let mut sources = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_markdown = path.extension().is_some_and(|e| e == "md");
        if entry.file_type().await?.is_file() && !is_markdown {
            sources.push(path);
        }
    }
    sources.sort();

    let mut solutions = Vec::with_capacity(sources.len());
    for path in &sources {
        let lang = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let code = tokio::fs::read_to_string(path).await?;
        solutions.push(format!(
            "### {}\n\n```{}\n{}\n```",
            lang.to_uppercase(),
            lang,
            code
        ));
    }

    Ok(format!(
        "# {title}\n\n{problem}\n\n## Solutions\n\n{code}\n\n## Note\n\n{note}\n",
        title = title,
        problem = strip_heading(&statement),
        code = solutions.join("\n\n"),
        note = note,
    ))
}

/// Drop the statement's own `# title` line; the page already has one.
fn strip_heading(statement: &str) -> &str {
    match statement.strip_prefix('#') {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body).trim_start(),
        None => statement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INDEX: &str = "| [1. Two Sum](./1.%20Two%20Sum) [🔗](https://leetcode.com/problems/two-sum/) | Easy | `Array` | [cpp](./1.%20Two%20Sum/two-sum.cpp) \\| [rust](./1.%20Two%20Sum/two-sum.rs) |";

    fn archive(root: &Path) {
        let dir = root.join("1. Two Sum");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(root.join("README.md"), INDEX).unwrap();
        std::fs::write(dir.join("README.md"), "# 1. Two Sum\n\nTags: `Array`\n\nFind two.").unwrap();
        std::fs::write(dir.join("NOTE.md"), "hash it").unwrap();
        std::fs::write(dir.join("two-sum.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.join("two-sum.cpp"), "int main() {}").unwrap();
    }

    #[test]
    fn test_rewrite_links() {
        let out = rewrite_links(INDEX);
        assert_eq!(
            out,
            "| [1. Two Sum](./1-two-sum) [🔗](https://leetcode.com/problems/two-sum/) | Easy | `Array` | [cpp](./1-two-sum/#cpp) \\| [rust](./1-two-sum/#rs) |"
        );
    }

    #[test]
    fn test_rewrite_links_decodes_titles() {
        let out = rewrite_links("[x](./50.%20Pow%28x,%20n%29) [y](./3.%20Can't%20Stop/a.py)");
        assert_eq!(out, "[x](./50-pow(x,-n)) [y](./3-cant-stop/#py)");
    }

    #[test]
    fn test_rewrite_links_repeatedly() {
        let first = rewrite_links(INDEX);
        assert_eq!(rewrite_links(INDEX), first);
        assert_eq!(rewrite_links("no links here"), "no links here");
        assert_eq!(rewrite_links("[abs](https://x.y/z) [up](../a)"), "[abs](https://x.y/z) [up](../a)");
    }

    #[test]
    fn test_strip_heading() {
        assert_eq!(strip_heading("# 1. Two Sum\n\nTags: x"), "Tags: x");
        assert_eq!(strip_heading("No heading"), "No heading");
    }

    #[tokio::test]
    async fn test_transform_tree() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("leetcode");
        let output = tmp.path().join("site");
        archive(&source);

        let summary = run_transform(&source, &output, Progress::silent()).await.unwrap();
        assert_eq!(summary.problems, 1);

        let doc = std::fs::read_to_string(output.join("1-two-sum/index.md")).unwrap();
        assert!(doc.starts_with("# 1. Two Sum\n\nTags: `Array`\n\nFind two."));
        let cpp = doc.find("### CPP\n\n```cpp\nint main() {}\n```").unwrap();
        let rs = doc.find("### RS\n\n```rs\nfn main() {}\n```").unwrap();
        assert!(cpp < rs);
        assert!(doc.ends_with("## Note\n\nhash it\n"));

        let index = std::fs::read_to_string(output.join("README.md")).unwrap();
        assert!(index.contains("(./1-two-sum/#rs)"));
    }

    #[tokio::test]
    async fn test_existing_output_is_refused() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("leetcode");
        archive(&source);

        let err = run_transform(&source, &source, Progress::silent()).await.unwrap_err();
        assert!(matches!(err, AppError::Site(_)));
    }

    #[tokio::test]
    async fn test_missing_source_is_refused() {
        let tmp = TempDir::new().unwrap();
        let err = run_transform(&tmp.path().join("nope"), &tmp.path().join("out"), Progress::silent())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Site(_)));
    }
}
