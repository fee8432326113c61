//! storefront - command line front end for the storefront core

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use storefront::core::{OrderStore, Session, classify};
use storefront::{SessionEvent, StorefrontConfig, logging};

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Foodie Express storefront client")]
struct Cli {
    /// JSON config file
    #[arg(long, env = "FOODIE_CONFIG", default_value = "storefront.json")]
    config: PathBuf,

    /// Remote service base URL
    #[arg(long, env = "FOODIE_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "FOODIE_CUSTOMER_ID")]
    customer_id: Option<String>,

    /// Directory for offline order history and logs
    #[arg(long, env = "FOODIE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Never contact the remote service
    #[arg(long, env = "FOODIE_OFFLINE_ONLY")]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a session and log its events until Ctrl-C
    Run,
    /// Print the menu
    Menu {
        /// Only this category ("all" for everything)
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Show current orders and history from the local order store
    Classify,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<StorefrontConfig> {
        let mut config = StorefrontConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(id) = &self.customer_id {
            config.customer_id = id.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if self.offline {
            config.offline_only = true;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let _guard = logging::init_logging(&config.logging, &config.log_dir())
        .context("initializing logging")?;

    match cli.command {
        Command::Run => run(config).await,
        Command::Menu { category } => menu(config, &category).await,
        Command::Classify => show_orders(&config),
    }
}

async fn start_session(config: StorefrontConfig) -> anyhow::Result<Session> {
    let gateway = config.client_config().build_gateway()?;
    Ok(Session::start(config, Arc::new(gateway)).await?)
}

async fn run(config: StorefrontConfig) -> anyhow::Result<()> {
    let session = start_session(config).await?;
    let mut events = session.events().subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SessionEvent::ConnectivityChanged { connected }) => {
                    tracing::info!(connected, "Connectivity changed");
                }
                Ok(SessionEvent::CartChanged { item_count, subtotal }) => {
                    tracing::info!(item_count, %subtotal, "Cart changed");
                }
                Ok(SessionEvent::OrdersChanged { count }) => {
                    tracing::info!(count, "Orders changed");
                }
                Ok(SessionEvent::MenuChanged { count }) => {
                    tracing::info!(count, "Menu changed");
                }
                Ok(SessionEvent::Notice { level, message }) => {
                    tracing::info!(?level, "{message}");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    session.shutdown().await;
    Ok(())
}

async fn menu(config: StorefrontConfig, category: &str) -> anyhow::Result<()> {
    let session = start_session(config).await?;
    let items = session.catalog().by_category(category).await;
    for item in &items {
        println!(
            "{:>4}  {:<28} {:>8}  {}{}",
            item.id,
            item.name,
            format!("${}", item.price),
            item.category,
            if item.available { "" } else { " (unavailable)" }
        );
    }
    let stats = session.catalog().stats().await;
    println!(
        "\n{} items, {} categories, average ${}",
        stats.item_count, stats.category_count, stats.average_price
    );
    session.shutdown().await;
    Ok(())
}

fn show_orders(config: &StorefrontConfig) -> anyhow::Result<()> {
    let orders = OrderStore::new(config.orders_path()).load()?;
    let classified = classify(&orders, chrono::Utc::now());

    println!("Current orders:");
    for order in &classified.current {
        let (min, max) = order.delivery.eta_minutes();
        println!(
            "  {}  {:<22} ${}  ({}-{} min, {})",
            order.id,
            order.status.label(),
            order.total,
            min,
            max,
            order.delivery
        );
    }
    println!("History:");
    for order in &classified.history {
        println!(
            "  {}  {}  {:<22} ${}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.status.label(),
            order.total
        );
    }
    Ok(())
}
