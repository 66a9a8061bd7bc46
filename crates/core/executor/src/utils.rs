use std::sync::Once;

use tracing_forest::ForestLayer;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

static INIT: Once = Once::new();

/// A simple logger.
///
/// Set the `RUST_LOG` environment variable to `debug` to see every halt and fault, or to `trace`
/// to see every executed instruction. Set `RUST_LOGGER` to `forest` for a tree of spans per run
/// instead of the default flat output.
pub fn setup_logger() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

        let logger_type = std::env::var("RUST_LOGGER").unwrap_or_else(|_| "flat".to_string());
        match logger_type.as_str() {
            "forest" => {
                let _ =
                    Registry::default().with(env_filter).with(ForestLayer::default()).try_init();
            }
            "flat" => {
                let _ = tracing_subscriber::fmt::Subscriber::builder()
                    .compact()
                    .with_file(false)
                    .with_target(false)
                    .with_thread_names(true)
                    .with_env_filter(env_filter)
                    .with_span_events(FmtSpan::CLOSE)
                    .finish()
                    .try_init();
            }
            _ => {
                panic!("Invalid logger type: {logger_type}");
            }
        }
    });
}
