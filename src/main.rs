use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use trigon_domains::registry::DomainsContract;
use trigon_domains::routes::create_router;
use trigon_domains::wallet::SignerWallet;
use trigon_domains::{menu, Config, DomainManager, NoticeBoard, WalletConnection};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trigon_domains=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.with_target(false).try_init();
    }
}

async fn connect_wallet(config: &Config) -> anyhow::Result<Option<WalletConnection>> {
    let Some(private_key) = &config.private_key else {
        tracing::warn!("PRIVATE_KEY not set, running without a wallet");
        return Ok(None);
    };

    let wallet = SignerWallet::connect(&config.rpc_url, private_key)
        .await
        .context("Failed to connect signer wallet")?;
    let wallet = Arc::new(wallet);
    tracing::info!(address = ?wallet.address(), rpc = %config.rpc_url, "Signer wallet ready");

    let registry = DomainsContract::new(wallet.clone(), &config.contract_address)
        .context("Invalid CONTRACT_ADDRESS")?;

    Ok(Some(WalletConnection {
        provider: wallet,
        registry: Arc::new(registry),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let notices = Arc::new(NoticeBoard::default());
    let wallet = connect_wallet(&config).await?;

    let bind_addr = config.bind_addr;
    let manager = Arc::new(DomainManager::new(config, wallet, notices.clone()));
    manager.initialize().await;

    if std::env::args().any(|arg| arg == "--menu") {
        let stdin = io::stdin();
        menu::run(manager, notices, stdin.lock(), io::stdout()).await?;
        return Ok(());
    }

    let app = create_router(manager, notices);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "Trigon Domain Manager listening");

    axum::serve(listener, app).await?;
    Ok(())
}
