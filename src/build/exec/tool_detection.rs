//! External tool detection and availability checking.
//!
//! The component build tool (waf) is a Python script that is started through
//! an interpreter explicitly, since Windows does not honour its shebang.

use std::sync::LazyLock;

/// Interpreter names tried in order.
const PYTHON_CANDIDATES: [&str; 2] = ["python", "python3"];

/// Python interpreter used to run waf.
///
/// Cached result to avoid repeated PATH lookups during a run. Falls back to
/// plain `python`, letting the spawn itself report the missing tool.
pub static PYTHON: LazyLock<String> = LazyLock::new(|| {
    for candidate in PYTHON_CANDIDATES {
        match which::which(candidate) {
            Ok(path) => {
                log::debug!("Found {} at: {}", candidate, path.display());
                return candidate.to_string();
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", candidate, e);
            }
        }
    }
    log::warn!(
        "No Python interpreter found in PATH (tried {}). Component builds will fail.",
        PYTHON_CANDIDATES.join(", ")
    );
    PYTHON_CANDIDATES[0].to_string()
});
