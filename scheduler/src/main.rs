use scheduler::config::load_config;
use scheduler::runner::Scheduler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = load_config();
    tracing::info!(apiserver=%config.apiserver, "Starting scheduler");

    let (sched, rx) = match Scheduler::new(&config) {
        Ok(built) => built,
        Err(error) => {
            tracing::error!(%error, "Invalid scheduler configuration");
            std::process::exit(1);
        }
    };

    sched.run(rx).await;
}
