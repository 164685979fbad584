use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitecore_agent::{config::Config, repl};
use sitecore_graph::ChatAgent;
use sitecore_openapi::{
    synthesize_tools, ApiCaller, ApiGatewayClient, CredentialProvider, SpecLoader, ToolRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config);
    tracing::debug!(?config, "Config loaded");

    // Fail on missing settings before any network activity
    let credentials = config.sitecore_credentials()?;
    let azure = config.azure_config()?;

    tracing::info!("Requesting access token");
    let token = CredentialProvider::new(&config.sitecore_token_url, &config.sitecore_audience)
        .obtain_token(&credentials)
        .await?;

    let gateway: Arc<dyn ApiCaller> = Arc::new(ApiGatewayClient::new(
        &config.sitecore_api_base_url,
        Arc::new(token),
    ));

    tracing::info!("Loading OpenAPI document");
    let document = SpecLoader::new(&config.sitecore_spec_url, &config.sitecore_spec_fallback)
        .load()
        .await?;

    let registry = ToolRegistry::new(synthesize_tools(&document, gateway));
    tracing::info!(tools = registry.len(), "Synthesized tools");

    let llm_client = Arc::new(azure.build_client()?);
    let agent = ChatAgent::builder()
        .llm_client(llm_client)
        .tool_executor(Arc::new(registry))
        .llm_config(config.llm_config(&azure.deployment))
        .build()?;

    repl::run(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), &agent).await
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so they never interleave with the chat on stdout
    match config.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
