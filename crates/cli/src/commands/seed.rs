//! Seed the database with demo catalog data.
//!
//! Inserts a small set of users, categories, markets, products and listings so
//! a fresh install has something to browse and compare. Listing coverage is
//! deliberately uneven across markets, which makes the shopping list
//! comparison endpoint worth looking at straight away.
//!
//! The command is a no-op when markets already exist, so it is safe to run
//! repeatedly.
//!
//! # Usage
//!
//! ```bash
//! bw seed
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Fallback connection string (set by Fly.io postgres attach)

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgConnection;
use thiserror::Error;
use tracing::info;

use basketwatch_api::db::create_pool;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if the database URL is missing or any insert fails. All
/// inserts run in one transaction, so a failure leaves the database untouched.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    let markets_count = sqlx::query_scalar::<_, i64>(
        r"
        SELECT COUNT(*) FROM markets
        ",
    )
    .fetch_one(&pool)
    .await?;

    if markets_count > 0 {
        info!("Database already contains market data, nothing to seed");
        return Ok(());
    }

    info!("Seeding demo data...");
    let mut tx = pool.begin().await?;

    let demo = insert_user(&mut tx, "Demo Shopper", "demo@basketwatch.dev").await?;
    insert_user(&mut tx, "Ada Marsh", "ada@basketwatch.dev").await?;

    let dairy = insert_category(&mut tx, "Dairy", "Milk, butter, cheese and yogurt").await?;
    let bakery = insert_category(&mut tx, "Bakery", "Bread and baked goods").await?;
    let produce = insert_category(&mut tx, "Produce", "Fresh fruit and vegetables").await?;
    let pantry = insert_category(&mut tx, "Pantry", "Dry goods and staples").await?;

    let greenfield = insert_market(
        &mut tx,
        "Greenfield Market",
        Some("https://greenfield.example.com"),
        Some("12 Orchard Way"),
        Some("555-0141"),
    )
    .await?;
    let cornerstop =
        insert_market(&mut tx, "CornerStop", None, Some("3 Station Parade"), None).await?;
    let valumart = insert_market(
        &mut tx,
        "ValuMart",
        Some("https://valumart.example.com"),
        Some("88 Harbor Road"),
        Some("555-0177"),
    )
    .await?;

    let milk = insert_product(
        &mut tx,
        "Whole Milk 1L",
        Some("Meadowbrook"),
        Some("4006381001014"),
        dairy,
    )
    .await?;
    let butter = insert_product(
        &mut tx,
        "Butter 250g",
        Some("Meadowbrook"),
        Some("4006381001021"),
        dairy,
    )
    .await?;
    let sourdough =
        insert_product(&mut tx, "Sourdough Loaf", None, Some("4006381002011"), bakery).await?;
    let bagels = insert_product(
        &mut tx,
        "Bagels 6-Pack",
        Some("Hearth & Stone"),
        Some("4006381002028"),
        bakery,
    )
    .await?;
    let bananas =
        insert_product(&mut tx, "Bananas 1kg", None, Some("4006381003018"), produce).await?;
    let tomatoes = insert_product(
        &mut tx,
        "Roma Tomatoes 1kg",
        None,
        Some("4006381003025"),
        produce,
    )
    .await?;
    let spaghetti = insert_product(
        &mut tx,
        "Spaghetti 500g",
        Some("Casa Bella"),
        Some("4006381004015"),
        pantry,
    )
    .await?;
    let olive_oil = insert_product(
        &mut tx,
        "Olive Oil 750ml",
        Some("Casa Bella"),
        Some("4006381004022"),
        pantry,
    )
    .await?;

    // Greenfield carries the full range; the other two have gaps.
    let listings = [
        (milk, greenfield, price(349)),
        (milk, cornerstop, price(365)),
        (milk, valumart, price(339)),
        (butter, greenfield, price(425)),
        (butter, valumart, price(410)),
        (sourdough, greenfield, price(520)),
        (sourdough, cornerstop, price(495)),
        (bagels, greenfield, price(610)),
        (bagels, cornerstop, price(625)),
        (bagels, valumart, price(585)),
        (bananas, greenfield, price(179)),
        (bananas, cornerstop, price(199)),
        (bananas, valumart, price(169)),
        (tomatoes, greenfield, price(289)),
        (tomatoes, valumart, price(265)),
        (spaghetti, greenfield, price(155)),
        (spaghetti, cornerstop, price(149)),
        (spaghetti, valumart, price(162)),
        (olive_oil, greenfield, price(1250)),
        (olive_oil, valumart, price(1195)),
    ];
    for (product_id, market_id, listing_price) in listings {
        insert_listing(&mut tx, product_id, market_id, listing_price).await?;
    }

    let list_id = sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO shopping_lists (user_id, name)
        VALUES ($1, $2)
        RETURNING id
        ",
    )
    .bind(demo)
    .bind("Weekly Groceries")
    .fetch_one(&mut *tx)
    .await?;

    insert_list_item(&mut tx, list_id, milk, 2).await?;
    insert_list_item(&mut tx, list_id, sourdough, 1).await?;
    insert_list_item(&mut tx, list_id, bananas, 3).await?;

    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Users: 2 (demo@basketwatch.dev, ada@basketwatch.dev)");
    info!("  Categories: 4");
    info!("  Markets: 3");
    info!("  Products: 8");
    info!("  Listings: {}", listings.len());
    info!("  Shopping lists: 1 (Weekly Groceries, 3 items)");

    Ok(())
}

fn database_url() -> Result<SecretString, SeedError> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("API_DATABASE_URL"))
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

async fn insert_user(conn: &mut PgConnection, name: &str, email: &str) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO users (name, email)
        VALUES ($1, $2)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email)
    .fetch_one(conn)
    .await
}

async fn insert_category(
    conn: &mut PgConnection,
    name: &str,
    description: &str,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(description)
    .fetch_one(conn)
    .await
}

async fn insert_market(
    conn: &mut PgConnection,
    name: &str,
    website: Option<&str>,
    address: Option<&str>,
    phone: Option<&str>,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO markets (name, website, address, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(website)
    .bind(address)
    .bind(phone)
    .fetch_one(conn)
    .await
}

async fn insert_product(
    conn: &mut PgConnection,
    name: &str,
    brand: Option<&str>,
    barcode: Option<&str>,
    category_id: i32,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO products (name, brand, barcode, category_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(brand)
    .bind(barcode)
    .bind(category_id)
    .fetch_one(conn)
    .await
}

/// Insert a listing plus its first price history row, matching what the API
/// does when a listing is created.
async fn insert_listing(
    conn: &mut PgConnection,
    product_id: i32,
    market_id: i32,
    listing_price: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO product_listings (product_id, market_id, price)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(product_id)
    .bind(market_id)
    .bind(listing_price)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r"
        INSERT INTO price_history (product_id, market_id, price)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(product_id)
    .bind(market_id)
    .bind(listing_price)
    .execute(conn)
    .await?;

    Ok(())
}

async fn insert_list_item(
    conn: &mut PgConnection,
    list_id: i32,
    product_id: i32,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO shopping_list_items (shopping_list_id, product_id, quantity)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(list_id)
    .bind(product_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    Ok(())
}
