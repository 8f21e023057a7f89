//! Fixtures shared by the `bootdag` integration tests.

pub mod builders;
pub mod recording;
pub mod scripted;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Upper bound on any single awaited run in a test. Paused-clock tests
/// advance virtual time, so this only trips on a genuine hang.
pub const RUN_DEADLINE: Duration = Duration::from_secs(5);

/// Route scheduler diagnostics into the per-test output capture.
///
/// Defaults to `bootdag` at debug and everything else at warn, so a failing
/// test shows every transition without runtime noise. `RUST_LOG` overrides it.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,bootdag=debug,bootdag_test_utils=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking if it has not finished within [`RUN_DEADLINE`].
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(RUN_DEADLINE, f).await {
        Ok(out) => out,
        Err(_) => panic!("run did not finish within {RUN_DEADLINE:?}"),
    }
}
