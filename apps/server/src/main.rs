use anyhow::Context;
use clap::{Parser, Subcommand};
use marketplace_config::{load as load_config, AppConfig};
use marketplace_database::{
    seed_defaults, ChatRepository, CollegeRepository, FavoriteRepository, MessageRepository,
    ProductFilter, ProductRepository, PurchaseRequestRepository, UserRepository,
};
use marketplace_gateway::{create_router, GatewayState};
use marketplace_runtime::{shutdown_signal, telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

/// Tables in child-before-parent order so deletes never trip a foreign key
const TABLES: &[&str] = &[
    "messages",
    "chat_participants",
    "chats",
    "favorites",
    "purchase_requests",
    "products",
    "users",
    "colleges",
];

const RECENT_PRODUCTS: usize = 10;

#[derive(Parser)]
#[command(name = "marketplace-backend")]
#[command(about = "Campus marketplace backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Insert the default college and sample products into an empty store
    SeedData,
    /// Print row counts and the most recent products
    DumpData,
    /// Delete every row from every table
    ClearData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config).await,
        Commands::Migrate => migrate(&config).await,
        Commands::SeedData => seed_data(&config).await,
        Commands::DumpData => dump_data(&config).await,
        Commands::ClearData => clear_data(&config).await,
    }
}

async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    info!("starting marketplace backend");

    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;

    let app = create_router(GatewayState::new(services.db_pool.clone()));

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("backend shut down");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise_without_seed(config)
        .await
        .context("failed to apply migrations")?;

    println!("Migrations applied to {}", config.database.url);
    services.db_pool.close().await;
    Ok(())
}

async fn seed_data(config: &AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise_without_seed(config)
        .await
        .context("failed to initialise backend services")?;

    let report = seed_defaults(&services.db_pool, &config.seed)
        .await
        .context("failed to seed database")?;

    if report.is_empty() {
        println!("Database already populated; nothing seeded");
    } else {
        println!("Database seeded:");
        println!("- {} colleges created", report.colleges);
        println!("- {} users created", report.users);
        println!("- {} products created", report.products);
        println!("Run 'dump-data' to see the inserted data");
    }

    Ok(())
}

async fn dump_data(config: &AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise_without_seed(config)
        .await
        .context("failed to initialise backend services")?;
    let pool = &services.db_pool;

    println!("=== ROW COUNTS ===");
    let counts = [
        ("colleges", CollegeRepository::new(pool.clone()).count().await?),
        ("users", UserRepository::new(pool.clone()).count().await?),
        ("products", ProductRepository::new(pool.clone()).count().await?),
        ("chats", ChatRepository::new(pool.clone()).count().await?),
        ("messages", MessageRepository::new(pool.clone()).count().await?),
        (
            "purchase_requests",
            PurchaseRequestRepository::new(pool.clone()).count().await?,
        ),
        ("favorites", FavoriteRepository::new(pool.clone()).count().await?),
    ];
    for (table, count) in counts {
        println!("{table:<20} {count}");
    }

    println!("\n=== RECENT PRODUCTS ===");
    let products = ProductRepository::new(pool.clone())
        .list(&ProductFilter::default())
        .await
        .context("failed to fetch products")?;

    if products.is_empty() {
        println!("No products found in database");
        return Ok(());
    }

    println!(
        "{:<38} {:<32} {:>10} {:<10} {:<24} {:<28}",
        "ID", "Title", "Price", "Status", "Seller", "Posted At"
    );
    println!("{}", "-".repeat(146));

    for product in products.into_iter().take(RECENT_PRODUCTS) {
        let title = if product.title.chars().count() > 30 {
            format!("{}...", product.title.chars().take(27).collect::<String>())
        } else {
            product.title
        };

        println!(
            "{:<38} {:<32} {:>10.2} {:<10} {:<24} {:<28}",
            product.id.to_string(),
            title,
            product.price,
            product.status.as_str(),
            product.seller.email,
            product.posted_at
        );
    }

    Ok(())
}

async fn clear_data(config: &AppConfig) -> anyhow::Result<()> {
    info!("clearing all data from database");

    let services = BackendServices::initialise_without_seed(config)
        .await
        .context("failed to initialise backend services")?;

    let mut tx = services
        .db_pool
        .begin()
        .await
        .context("failed to start transaction")?;

    println!("Database cleared:");
    for table in TABLES {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to delete {table}"))?;
        println!("- {} {table} deleted", deleted.rows_affected());
    }

    tx.commit().await.context("failed to commit clear")?;
    Ok(())
}
