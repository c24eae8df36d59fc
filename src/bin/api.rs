use lambda_runtime::{Error, run, service_fn};
use std::sync::Arc;
use tldw::core::config::AppConfig;
use tldw::worker::SummaryService;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tldw::setup_logging(false);
            error!("Config error: {}", e);
            return Err(Error::from(e));
        }
    };
    tldw::setup_logging(config.debug);

    let service = Arc::new(SummaryService::from_config(&config)?);
    service.models().warm_up().await?;
    info!(
        load_strategy = ?service.models().strategy(),
        "Summary API ready"
    );

    run(service_fn(|event| {
        let service = Arc::clone(&service);
        async move { tldw::api::function_handler(&service, event).await }
    }))
    .await
}
