//! Minimal diagnostics output. No structured-logging crate: diagnostics are
//! gated `eprintln!` lines, matching the CLI's own verbose-flag convention.

use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable verbose diagnostics for the remainder of the process, from either
/// the `--verbose` flag or a non-empty `CDK_COST_ANALYZER_DEBUG`.
pub fn init(verbose_flag: bool) {
    let env_debug = std::env::var("CDK_COST_ANALYZER_DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    VERBOSE.store(verbose_flag || env_debug, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print a debug line to stderr when verbose diagnostics are enabled.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            use colored::Colorize;
            eprintln!("{} {}", "debug:".dimmed(), format!($($arg)*));
        }
    };
}

/// Print a warning line to stderr unconditionally.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{} {}", "warning:".yellow().bold(), format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_reads_env_flag() {
        std::env::set_var("CDK_COST_ANALYZER_DEBUG", "1");
        init(false);
        assert!(is_verbose());
        std::env::remove_var("CDK_COST_ANALYZER_DEBUG");
    }
}
