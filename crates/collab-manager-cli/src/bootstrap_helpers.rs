use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

fn build_env_filter(rust_log: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(DEFAULT_LOG_LEVEL.into());
    match rust_log {
        Some(directives) => builder.parse_lossy(directives),
        None => builder.parse_lossy(""),
    }
}

/// Log to stderr so workflow output keeps the action's diagnostics; `RUST_LOG`
/// overrides the `warn` default.
pub fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();
}
