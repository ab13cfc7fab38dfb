//! Debug dumps to files, for inspecting generator runs by hand.
//!
//! Everything here is inert unless the `dev-mode` feature is enabled.

#[doc(hidden)]
pub use chrono as __chrono;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Directory the `fluentgen_log!` macro writes to.
///
/// Taken from `FLUENTGEN_LOG_DIR`, falling back to `./fluentgen/logs`.
pub fn log_dir() -> PathBuf {
    std::env::var("FLUENTGEN_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("fluentgen/logs"))
}

/// Appends (or writes) one entry to `file_name` inside [`log_dir`].
///
/// Failures are ignored; a debug dump must never break a generation run.
#[doc(hidden)]
pub fn write_entry(file_name: &str, append: bool, entry: &str) {
    let dir = log_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    if let Ok(mut file) = options.open(dir.join(file_name)) {
        let _ = writeln!(file, "{}", entry);
    }
}

/// Dumps a string to a log file under `$FLUENTGEN_LOG_DIR`.
///
/// Only writes when the `dev-mode` feature is enabled; otherwise the
/// arguments are borrowed and discarded. Without a file name, each call
/// gets a timestamped file of its own.
///
/// ```no_run
/// # use fluentgen_core::fluentgen_log;
/// fluentgen_log!("Generation started");
/// fluentgen_log!(format!("{} builders", 3), "synthesis.log", true);
/// ```
#[cfg(feature = "dev-mode")]
#[macro_export]
macro_rules! fluentgen_log {
    ($content:expr) => {{
        let file_name = format!(
            "{}.log",
            $crate::log::__chrono::Local::now().format("%Y_%m_%d_%H_%M_%S")
        );
        $crate::fluentgen_log!($content, file_name, false);
    }};
    ($content:expr, $file_name:expr) => {{
        $crate::fluentgen_log!($content, $file_name, false);
    }};
    ($content:expr, $file_name:expr, $append:expr) => {{
        let content = $content;
        $crate::log::write_entry(
            &$file_name,
            $append,
            ::core::convert::AsRef::<str>::as_ref(&content),
        );
    }};
}

#[cfg(not(feature = "dev-mode"))]
#[macro_export]
macro_rules! fluentgen_log {
    ($content:expr) => {{
        let _ = &$content;
    }};
    ($content:expr, $file_name:expr) => {{
        let _ = (&$content, &$file_name);
    }};
    ($content:expr, $file_name:expr, $append:expr) => {{
        let _ = (&$content, &$file_name, &$append);
    }};
}
