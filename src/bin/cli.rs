//! LeetCode Dump CLI
//!
//! Dumps accepted submissions into a local archive and renders it as a site.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use leetcode_dump::{
    error::Result,
    models::Config,
    pipeline,
    services::LeetCodeClient,
    storage::{LocalStorage, SubmissionCache},
    utils::{log::Progress, retry::RetryPolicy},
};

/// leetcode-dump - Archive your LeetCode solutions
#[derive(Parser, Debug)]
#[command(
    name = "leetcode-dump",
    version,
    about = "Dump your accepted LeetCode submissions into a browsable archive"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "leetcode-dump.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump accepted submissions into the archive
    Dump(DumpArgs),

    /// Transform the archive into a site source tree
    Transform {
        /// Archive directory (default: site.source_dir)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory, must not exist (default: site.transform_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a static site from the archive
    Build {
        /// Archive directory (default: site.source_dir)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Site output directory (default: site.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file passed to the site generator
        #[arg(long)]
        generator_config: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show the submission cache state
    Info,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// LeetCode session cookie
    #[arg(short, long, env = "LEETCODE_SESSION", hide_env_values = true)]
    session: String,

    /// Output directory (default: paths.output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Remove the output directory and cached submissions before starting
    #[arg(short, long)]
    clean: bool,

    /// Rate limit as <requests>/<seconds>
    #[arg(short, long)]
    limit: Option<String>,

    /// Timezone for solve dates
    #[arg(short, long)]
    timezone: Option<String>,

    /// Write bare code without the metadata header
    #[arg(short, long)]
    pure: bool,

    /// Attempts per remote call
    #[arg(short, long)]
    retry: Option<u32>,
}

impl DumpArgs {
    /// Apply command line overrides on top of the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.paths.output_dir = output.clone();
        }
        if let Some(limit) = &self.limit {
            config.client.rate_limit = limit.clone();
        }
        if let Some(timezone) = &self.timezone {
            config.archive.timezone = timezone.clone();
        }
        if self.pure {
            config.archive.pure = true;
        }
        if let Some(retry) = self.retry {
            config.retry.max_attempts = retry;
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            if e.is_auth() {
                log::error!("Check your LEETCODE_SESSION cookie and try again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config);
    log::debug!("Configuration: {:?}", config);
    let progress = Progress::new(!cli.quiet);

    match cli.command {
        Command::Dump(args) => {
            args.apply(&mut config);
            config.validate()?;

            let retry = RetryPolicy::from_config(&config.retry);
            let client = retry
                .run("connect", || LeetCodeClient::connect(&config.client, &args.session))
                .await?;
            let cache = LocalStorage::new(&config.paths.state_dir);

            let report = pipeline::run_dump(&config, &client, &cache, args.clean, progress).await?;
            log::info!(
                "Dumped {} solutions of {} to {}",
                report.submissions,
                report.username,
                config.paths.output_dir.display()
            );
        }

        Command::Transform { source, output } => {
            let source = source.unwrap_or(config.site.source_dir);
            let output = output.unwrap_or(config.site.transform_dir);
            pipeline::run_transform(&source, &output, progress).await?;
        }

        Command::Build {
            source,
            output,
            generator_config,
        } => {
            if let Some(source) = source {
                config.site.source_dir = source;
            }
            if let Some(output) = output {
                config.site.output_dir = output;
            }
            if generator_config.is_some() {
                config.site.generator_config = generator_config;
            }
            pipeline::run_build(&config.site, progress).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!(
                "Rate limit {}, {} attempt(s) per call, timezone {}",
                config.client.rate_limit()?,
                config.retry.max_attempts,
                config.archive.timezone
            );
        }

        Command::Info => {
            let cache = LocalStorage::new(&config.paths.state_dir);
            log::info!("State directory: {}", cache.root_dir().display());
            log::info!(
                "Archive: {} ({})",
                config.paths.output_dir.display(),
                if config.paths.output_dir.exists() {
                    "exists"
                } else {
                    "not found"
                }
            );

            let state = cache.load().await?;
            if state.submissions.is_empty() {
                log::info!("No cached submissions yet.");
            } else {
                let problems: std::collections::HashSet<&str> = state
                    .submissions
                    .iter()
                    .map(|s| s.title_slug.as_str())
                    .collect();
                log::info!(
                    "Cached submissions: {} across {} problems",
                    state.submissions.len(),
                    problems.len()
                );
                log::info!("High-water mark: {}", state.high_water_mark());
            }
            log::info!("Skipped submissions: {}", state.skip.len());
        }
    }

    Ok(())
}
