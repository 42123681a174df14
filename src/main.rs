use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ipbot::cache::LookupCache;
use ipbot::config::Config;
use ipbot::gateway::client::GatewayClient;
use ipbot::gateway::intents::Intents;
use ipbot::gateway::session::Session;
use ipbot::handler::IpLookupHandler;
use ipbot::lookup::IpLookupClient;
use ipbot::rest::ApiClient;
use ipbot::token::Token;

#[derive(Parser)]
#[command(name = "ipbot", version, about = "Guild bot that answers /ip lookups")]
struct Args {
    /// Path to the YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipbot=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config).expect("failed to load config");
    print_banner(&config);

    let token = Token::bot(config.app_id, config.token.clone());
    let api = ApiClient::new(&config.api_base_url, &token);
    let lookup = IpLookupClient::new(
        &config.lookup.base_url,
        &config.lookup.app_id,
        &config.lookup.app_secret,
    );
    let cache = LookupCache::open(&config.cache.path, Duration::from_secs(config.cache.ttl_secs))
        .expect("failed to open lookup cache");

    let gateway = api
        .gateway_bot()
        .await
        .expect("failed to resolve gateway URL");
    eprintln!("  \x1b[32m→ connecting to {}\x1b[0m", gateway.url);
    eprintln!();

    let session = Session::single_shard(
        gateway.url,
        gateway.shards,
        token,
        Intents::PUBLIC_GUILD_MESSAGES,
    );
    let handler = Arc::new(IpLookupHandler::new(api, lookup, cache));

    let client = GatewayClient::new(session, handler);
    if let Err(e) = client.run().await {
        tracing::error!("gateway connection ended: {e}");
    }
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    let build = env!("GIT_SHA");

    eprintln!();
    eprintln!("  \x1b[1;36mipbot\x1b[0m \x1b[2mv{version} ({build})\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mapp id\x1b[0m       {}", config.app_id);
    eprintln!("  \x1b[2mapi\x1b[0m          {}", config.api_base_url);
    eprintln!("  \x1b[2mlookup\x1b[0m       {}", config.lookup.base_url);
    eprintln!("  \x1b[2mcache\x1b[0m        {}", config.cache.path.display());
    eprintln!();
}
