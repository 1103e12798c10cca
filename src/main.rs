use lambda_runtime::{service_fn, Error, LambdaEvent};
use poster_lambda::{
    bedrock, logger, Config, ImageClient, LambdaResponse, PosterHandler, S3ObjectStore,
};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;
    if !dotenv_loaded {
        log::debug!("No .env file found, using environment variables");
    }

    let config = Config::from_env()?;
    logger::log_config_info(&config);

    let sdk_config = config.load_aws_config().await;
    let bedrock_client = bedrock::build_client(&sdk_config);
    let generator = Arc::new(ImageClient::new(bedrock_client, &config.bedrock.model_id));
    let store = Arc::new(S3ObjectStore::from_sdk_config(&sdk_config, config.storage.clone()));

    let handler = Arc::new(PosterHandler::new(generator, store, &config.storage));
    log::info!("Poster handler ready");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { handle_event(&handler, event).await }
    }))
    .await
}

async fn handle_event(
    handler: &PosterHandler,
    event: LambdaEvent<Value>,
) -> Result<LambdaResponse, Error> {
    let (payload, context) = event.into_parts();
    logger::set_request_id(context.request_id);

    let result = handler.handle(payload).await;
    if let Err(e) = &result {
        log::error!("Poster generation failed: {}", e);
    }

    logger::clear_request_id();
    Ok(result?)
}
