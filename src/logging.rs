//! Logger setup. The TUI owns stdout/stderr, so records go to a file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Initialise `env_logger` writing to `path` (`RUST_LOG` overrides the
/// default `info` level). Falls back to stderr when the file cannot be opened.
pub fn init(path: Option<&Path>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(file) = path.and_then(open_log_file) {
        builder.target(Target::Pipe(Box::new(file)));
    }

    // A second init (tests, repeated runs in one process) is harmless.
    let _ = builder.try_init();
}

fn open_log_file(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("studymate.log");
        init(Some(&path));
        assert!(path.exists());
    }
}
