use tracing_subscriber::EnvFilter;

use medforge::config::{self, RunConfig};
use medforge::pipeline;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let run_config = RunConfig::standard(chrono::Local::now().naive_local());
    match pipeline::run_all(&run_config) {
        Ok(outcomes) => {
            for outcome in outcomes {
                tracing::info!(
                    domain = outcome.domain,
                    rows = outcome.raw_rows,
                    raw = %outcome.raw_path.display(),
                    report = %outcome.report_path.display(),
                    "Artifacts ready"
                );
            }
            tracing::info!("Report generation complete");
        }
        Err(e) => {
            tracing::error!("Report generation aborted: {e}");
            std::process::exit(1);
        }
    }
}
