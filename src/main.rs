use anyhow::Result;
use food_labeler::config::AppConfig;
use food_labeler::errors::error_logging;
use food_labeler::localization::LabelVocabulary;
use food_labeler::observability;
use food_labeler::reference_data::ReferenceData;
use food_labeler::server;
use food_labeler::service::LabelService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // Initialize logging and metrics before anything else can log
    let metrics_handle = observability::init_observability_with_config(&config.observability)?;

    if let Err(e) = config.validate() {
        error_logging::log_config_error(&e, "AppConfig", "startup_validation");
        return Err(e.into());
    }
    info!("{}", config.summary());

    let reference_data = ReferenceData::load(config.reference_data.data_dir.as_deref())?;
    info!(
        allergens = reference_data.allergens.len(),
        standard_ingredients = reference_data.standard_ingredients.entries().len(),
        "Reference data ready"
    );

    let vocabulary = LabelVocabulary::new()?;
    let service = Arc::new(LabelService::new(
        Arc::new(reference_data),
        Arc::new(vocabulary),
    ));

    server::serve(service, &config.server, metrics_handle).await?;

    info!("Label server stopped");
    Ok(())
}
