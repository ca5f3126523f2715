//! `catalogd`: runs the product, review and inventory services.
//!
//! Each service can run in its own process (`catalogd product`) or all of
//! them behind one listener (`catalogd all`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use catalog_services::{
    http, InMemoryStore, InventoryRecord, InventoryService, Product, ProductService, Review,
    ReviewService, ServiceConfig,
};

#[derive(Parser, Debug)]
#[command(name = "catalogd", about = "Catalog microservices")]
struct Cli {
    /// Path to a TOML config file (built-in defaults when omitted).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(long, global = true)]
    listen: Option<String>,

    #[command(subcommand)]
    service: Service,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Service {
    /// Product service (`/products`).
    Product,
    /// Review service (`/reviews`).
    Review,
    /// Inventory service (`/inventory`).
    Inventory,
    /// All services on one listener.
    All,
}

fn product_service(config: &ServiceConfig) -> anyhow::Result<ProductService> {
    let store = config
        .product
        .open::<Product>(&config.data_dir, "products.db")
        .context("failed to open product store")?;
    Ok(ProductService::new(store))
}

fn inventory_service(config: &ServiceConfig) -> anyhow::Result<InventoryService> {
    let store = config
        .inventory
        .open::<InventoryRecord>(&config.data_dir, "inventory.db")
        .context("failed to open inventory store")?;
    Ok(InventoryService::new(store))
}

fn review_service() -> ReviewService {
    ReviewService::new(Arc::new(InMemoryStore::<Review>::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    config.verify()?;

    info!(service = ?cli.service, listen = %config.listen, "starting catalogd");

    let app = match cli.service {
        Service::Product => http::product_app(product_service(&config)?),
        Service::Review => http::review_app(review_service()),
        Service::Inventory => http::inventory_app(inventory_service(&config)?),
        Service::All => http::catalog_app(
            product_service(&config)?,
            review_service(),
            inventory_service(&config)?,
        ),
    };

    http::serve(app, &config.listen)
        .await
        .with_context(|| format!("server on {} failed", config.listen))?;
    Ok(())
}
