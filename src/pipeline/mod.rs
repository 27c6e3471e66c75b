//! Pipeline entry points.
//!
//! - `run_dump`: Resolve best submissions and write the archive
//! - `run_transform`: Turn the archive into a site source tree
//! - `run_build`: Transform, then run the static site generator

pub mod archive;
pub mod build;
pub mod dump;
pub mod resolve;
pub mod transform;

#[cfg(test)]
pub(crate) mod fake;

pub use archive::{ArchiveOptions, ArchiveSummary, ArchiveWriter};
pub use build::run_build;
pub use dump::{DumpReport, run_dump};
pub use resolve::BestSubmissionResolver;
pub use transform::{TransformSummary, run_transform};
