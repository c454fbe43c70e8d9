// Library surface for the binary, headless integration tests and reuse.
pub mod alert;
pub mod analytics;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod masters;
pub mod runtime;
pub mod session;
pub mod store;
pub mod target;
pub mod timer;
pub mod ui;
pub mod util;

pub use error::{ConfigError, MasterError, RangeError, StoreError, TimerError};
pub use session::{SessionConfig, SessionRecord, SessionStatus};
pub use target::TargetHistory;
pub use timer::{Phase, Timer, TimerEvent, TimerState};
