//! Time formatting helpers.

use std::time::Duration;

/// Render an age as whole seconds, switching to minutes once it passes one.
pub fn format_duration(d: Duration) -> String {
    match d.as_secs() {
        secs @ 0..=59 => format!("{secs}s"),
        secs => format!("{}m {:02}s", secs / 60, secs % 60),
    }
}
