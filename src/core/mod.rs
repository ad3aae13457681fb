//! Core infrastructure module for irregular-ts.
//!
//! - [`types`]: array conventions, splits, imputation names and channel layout
//! - [`constants`]: sentinels and configuration defaults
//! - [`error`]: error type and `Result` alias
//! - [`traits`]: the [`Fitted`](traits::Fitted) state check
//!
//! ```rust
//! use irregular_ts::core::{
//!     types::{ChannelLayout, Split},
//!     error::{Result, TimeSeriesError},
//! };
//!
//! let layout = ChannelLayout::new(3, true, true, true);
//! assert_eq!(layout.total(), 10);
//! assert_eq!("val".parse::<Split>()?, Split::Val);
//! # Ok::<(), TimeSeriesError>(())
//! ```

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{Result, TimeSeriesError};
pub use traits::*;
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static CORE_INIT: Once = Once::new();
static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging for the library.
///
/// Installs `env_logger` with an `info` default filter unless `RUST_LOG`
/// says otherwise. A logger installed earlier by the host application is
/// left alone.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        // Err only means another logger is already installed.
        let _ = env_logger::Builder::from_env(env).try_init();
        CORE_INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!("irregular-ts {} initialized", IRREGULAR_TS_VERSION);
    });
    Ok(())
}

/// Check if the core module is initialized
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}
