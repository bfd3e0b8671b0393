//! Overworld client binary.
//!
//! Loads the content directory, then plays the scripted input plan through
//! the state stack and the event engine without a display.
//!
//! # Examples
//!
//! ```bash
//! # Bundled demo content and input plan
//! cargo run -p overworld-client
//!
//! # Custom content, watching script activity
//! RUST_LOG=overworld=debug,runtime::events=debug \
//!     OVERWORLD_CONTENT_DIR=./my-content OVERWORLD_INPUTS="up,-,a" \
//!     cargo run -p overworld-client
//! ```

use anyhow::Result;
use overworld_client::{ClientConfig, Session, logging};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!(target: "overworld", content = %config.content_dir.display(), "starting");
    let summary = Session::load(&config)?.run();

    for (key, value) in &summary.variables {
        tracing::info!(target: "overworld", %key, %value, "variable");
    }
    for (item, quantity) in &summary.inventory {
        tracing::info!(target: "overworld", %item, quantity, "item");
    }
    if summary.script_failures + summary.stack_errors + summary.teleport_errors > 0 {
        tracing::warn!(
            target: "overworld",
            script_failures = summary.script_failures,
            stack_errors = summary.stack_errors,
            teleport_errors = summary.teleport_errors,
            "session had errors"
        );
    }
    Ok(())
}
