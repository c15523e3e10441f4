#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use toon_savings::adapters::DEFAULT_ENCODING;
#[cfg(feature = "lambda")]
use toon_savings::utils::logger;
#[cfg(feature = "lambda")]
use toon_savings::{
    ApiRequest, ApiResponse, ApiService, FormatComparator, ModelCatalog, TokenCounter, ToonCodec,
};

#[cfg(feature = "lambda")]
async fn function_handler(
    service: &ApiService<ToonCodec, TokenCounter>,
    event: LambdaEvent<ApiRequest>,
) -> Result<ApiResponse, Error> {
    tracing::info!("Handling {} request", action_name(&event.payload));

    service.handle(event.payload).map_err(|e| {
        tracing::error!("❌ Request failed: {} (Severity: {:?})", e, e.severity());
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })
}

#[cfg(feature = "lambda")]
fn action_name(request: &ApiRequest) -> &'static str {
    match request {
        ApiRequest::Encode { .. } => "encode",
        ApiRequest::Decode { .. } => "decode",
        ApiRequest::Compare { .. } => "compare",
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 由環境變數設定 tokenizer 與模型清單
    let encoding = std::env::var("TOKEN_ENCODING").unwrap_or_else(|_| DEFAULT_ENCODING.to_string());
    let catalog = match std::env::var("MODEL_CATALOG") {
        Ok(path) => ModelCatalog::from_file(path)?,
        Err(_) => ModelCatalog::builtin(),
    };
    let tokenizer = TokenCounter::for_encoding(&encoding)?;

    let service = ApiService::new(
        FormatComparator::new(ToonCodec::default(), tokenizer, encoding),
        catalog,
    );
    let service = &service;

    run(service_fn(move |event| async move {
        function_handler(service, event).await
    }))
    .await
}
