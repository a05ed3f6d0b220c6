use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() -> Result<()> {
    // RUST_LOG overrides; default keeps the report pipeline chatty enough
    // to follow per-file timings.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "gig_report_services=info,info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    Ok(())
}
