// src/utils/log.rs

//! Console progress output with server-style formatting.
//!
//! Diagnostics go through the `log` macros; this reporter prints the
//! user-facing run narrative (headers, steps, results) and can be silenced.

use chrono::Local;

/// Progress reporter for a single run.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    enabled: bool,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A reporter that prints nothing.
    pub fn silent() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log a header
    pub fn header(&self, title: &str) {
        if self.enabled {
            println!();
            println!("{}", "═".repeat(60));
            println!("  {}", title);
            println!("{}", "═".repeat(60));
        }
    }

    /// Log a step in a process
    pub fn step(&self, step_num: usize, total: usize, message: &str) {
        if self.enabled {
            println!(
                "[{}] [STEP {}/{}] {}",
                Local::now().format("%H:%M:%S"),
                step_num,
                total,
                message
            );
        }
    }

    /// Log a success message
    pub fn success(&self, message: &str) {
        if self.enabled {
            println!(
                "[{}] [INFO] ✓ {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            );
        }
    }

    /// Log a sub-item (indented)
    pub fn sub_item(&self, message: &str) {
        if self.enabled {
            println!("    {}", message);
        }
    }

    /// Log a summary section
    pub fn summary(&self, title: &str, items: &[(&str, String)]) {
        if self.enabled {
            println!();
            println!("[{}] [SUMMARY] {}", Local::now().format("%H:%M:%S"), title);
            for (key, value) in items {
                println!("    {}: {}", key, value);
            }
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}
