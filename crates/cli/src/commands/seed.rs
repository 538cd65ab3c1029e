//! Catalog seeding command.
//!
//! Inserts a small demo catalog so checkout can be exercised on a fresh
//! database. Refuses to run against a non-empty catalog.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::{CommandError, database_url};

/// Demo catalog: (name, description, price in cents, stock).
const DEMO_PRODUCTS: &[(&str, &str, i64, i32)] = &[
    (
        "Camiseta Jabuticaba",
        "Organic cotton tee with the jabuticaba print",
        7990,
        40,
    ),
    (
        "Caneca Esmaltada",
        "Enamel mug, 300ml, holds heat surprisingly well",
        4990,
        25,
    ),
    (
        "Ecobag Feira",
        "Reinforced canvas tote for the saturday market",
        3490,
        60,
    ),
    (
        "Caderno Pautado A5",
        "Lined notebook, 160 pages, lay-flat binding",
        1999,
        80,
    ),
    (
        "Garrafa Térmica 500ml",
        "Stainless bottle, 12h cold / 6h hot",
        8990,
        15,
    ),
];

/// Insert the demo catalog into an empty products table.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;

    if existing > 0 {
        tracing::info!(existing, "Catalog already has products, nothing to do");
        return Ok(());
    }

    for &(name, description, price_cents, stock) in DEMO_PRODUCTS {
        sqlx::query(
            r"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(name)
        .bind(description)
        .bind(Decimal::new(price_cents, 2))
        .bind(stock)
        .execute(&pool)
        .await?;

        tracing::info!(name, "Seeded product");
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "Catalog seeded");
    Ok(())
}
