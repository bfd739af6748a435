use anyhow::{Context, Result};
use listing_optimizer::{
    BatchDriver, Config, EnrichmentPipeline, OpenAIGenerator, RewriteClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_optimizer=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    // Load config
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize OpenAI client
    let mut generator =
        OpenAIGenerator::new(config.openai_api_key.clone()).with_model(config.openai_model.clone());
    if let Some(base_url) = &config.openai_base_url {
        generator = generator.with_base_url(base_url.clone());
    }

    tracing::info!(
        model = %generator.model(),
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        "Listing optimizer starting"
    );

    let client = RewriteClient::new(generator).with_policy(config.retry_policy.clone());
    let pipeline =
        EnrichmentPipeline::new(client).with_identifier_generator(config.identifier_generator());
    let mut driver = BatchDriver::new(pipeline).with_record_delay(config.record_delay);

    let summary = driver
        .run_file(&config.input_path, &config.output_path)
        .await
        .context("Listing optimization run failed")?;

    println!("\n{}", summary);
    println!("\nResults written to {}", config.output_path.display());

    Ok(())
}
