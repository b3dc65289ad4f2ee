use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

pub struct LoggerUtils {}

impl LoggerUtils {
    /// Installs the global subscriber. Logs go to stderr so stdout only carries
    /// the rendered layer information.
    pub fn init(verbose: bool) {
        // RUST_LOG wins; warn when unset
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();

        if verbose && let Ok(directive) = "layer_inspect=debug".parse() {
            filter = filter.add_directive(directive);
        }

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .compact()
            .init();
    }
}
