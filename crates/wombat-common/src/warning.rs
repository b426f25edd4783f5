//! Engine warnings with colored terminal output.
//!
//! Warnings are attributed to a [`Component`] and deduplicated, so an
//! unsupported CSS value repeated across a large document prints once.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use strum_macros::Display;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// The part of the engine a warning is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Component {
    /// Style value parsing and resolution.
    #[strum(serialize = "CSS")]
    Css,
    /// Font discovery and metrics.
    Fonts,
    /// Flow layout, including resource loads it triggers.
    Layout,
}

static WARNED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

fn warned() -> &'static Mutex<HashSet<String>> {
    WARNED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Record a warning key, reporting whether it is new.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
fn record(key: String) -> bool {
    warned().lock().unwrap().insert(key)
}

/// Warn about an unsupported feature (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once(Component::Css, "unsupported unit 'em' in font-size: 1.5em");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: Component, message: &str) {
    if record(format!("[{component}] {message}")) {
        eprintln!("{YELLOW}[Wombat {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call when loading a new page)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    warned().lock().unwrap().clear();
}
