//! PHI-aware logging for the HealthDesk Portal Engine
//!
//! Consultation signaling touches patient emails, phone numbers and session
//! tokens. Anything destined for a log line goes through [`PhiRedactor`]
//! first so none of those values appear raw in output.
//!
//! # Redacted Data Types
//!
//! - **Email addresses**: `jane@example.com` → `jan***@***`
//! - **Phone numbers**: bare 10-digit subscriber numbers → `98******10`
//! - **Session tokens**: long opaque `token=`/bearer values → `token=[REDACTED]`
//!
//! The server binary calls [`init_tracing`] once at startup; library crates
//! only depend on `tracing` and use [`PhiRedactor`] directly where they must
//! log identifying values.

pub mod redactor;

pub use redactor::{PhiRedactor, RedactionConfig};

use portal_errors::{PortalError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the process-wide tracing subscriber.
///
/// `verbose` lowers the default filter from `info` to `debug`. The
/// `RUST_LOG` environment variable wins over both when set.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| PortalError::Config(format!("failed to initialize tracing: {e}")))?;

    Ok(())
}
