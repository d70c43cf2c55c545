use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Install the global subscriber. Output goes to stderr so that
    /// descriptors printed on stdout can be piped straight to the bundler.
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("scrumpy_build=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

    pub fn resolving(mode: &str, project: &str) {
        info!("🔧 Resolving build descriptor");
        info!("  • Mode: {}", mode);
        info!("  • Project: {}", project);
    }

    pub fn resolved(entries: usize, rules: usize, plugins: usize) {
        info!(
            "📦 Descriptor ready: {} entry sources, {} rules, {} plugins",
            entries, rules, plugins
        );
    }

    pub fn written(path: &str, bytes: usize) {
        info!("✅ Wrote descriptor to {} ({} bytes)", path, bytes);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
