pub mod config;
pub mod error;
pub mod haptics;
pub mod types;

pub use config::DictapadConfig;
pub use error::{DictapadError, Result};
pub use haptics::{HapticFeedback, HapticPulse, NoopHaptics};
pub use types::*;
