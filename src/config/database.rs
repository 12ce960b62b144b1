//! Database configuration module for GESTIMA.
//!
//! Handles the SQLite connection and table creation using SeaORM. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{
    Batch, Machine, MaterialInput, MaterialPriceCategory, MaterialPriceTier, Operation, Part,
    Quote, QuoteItem,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local SQLite path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/gestima.sqlite".to_string())
}

/// Establishes a connection to the database using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Machine)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(MaterialPriceCategory)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(MaterialPriceTier)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Part)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(MaterialInput)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Operation)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Batch)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Quote)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(QuoteItem)))
        .await?;

    Ok(())
}
