pub mod annotation;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod factorial;
pub mod format;
pub mod lexer;
pub mod options;
pub mod style;

pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber used by every binary of the crate.
///
/// Stdout is reserved for program output (the fixture line, TeX host
/// commands), so logs never go there. The filter comes from `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
