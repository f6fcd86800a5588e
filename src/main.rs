use tracing_subscriber::EnvFilter;
use yt_analyzer::Config;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    let _ = dotenvy::dotenv();
    init_tracing();

    // Load configuration from CLI, environment and/or config file
    let config = Config::load()?;
    yt_analyzer::run(config).await
}
