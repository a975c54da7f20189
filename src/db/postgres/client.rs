use std::time::Duration;

use anyhow::Context;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use log::{info, warn};
use tokio_postgres::NoTls;

use crate::config::PostgresSettings;

/// Schema applied on startup; every statement is idempotent.
const SCHEMA: &str = include_str!("../../../schema/postgres.sql");

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_BACKOFF: Duration = Duration::from_millis(200);

/// Statements of a migration script with comment lines removed.
///
/// A statement ends at a line ending in `;` outside a `$$` body, so
/// plpgsql function bodies stay in one piece.
fn migration_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_body = false;

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        if line.matches("$$").count() % 2 == 1 {
            in_body = !in_body;
        }
        current.push(line);

        if !in_body && trimmed.ends_with(';') {
            statements.push(current.join("\n").trim_end_matches(';').to_string());
            current.clear();
        }
    }

    if !current.is_empty() {
        statements.push(current.join("\n"));
    }

    statements
}

fn build_pool(settings: &PostgresSettings) -> anyhow::Result<Pool> {
    let mut pg_config = tokio_postgres::Config::new();
    pg_config
        .host(&settings.host)
        .port(settings.port)
        .user(&settings.user)
        .password(&settings.password)
        .dbname(&settings.database);

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    Pool::builder(manager)
        .max_size(settings.pool_size)
        .build()
        .context("Failed to create PostgreSQL connection pool")
}

/// Pooled connection to the snapshot database.
#[derive(Clone)]
pub struct PostgresClient {
    pub pool: Pool,
}

impl PostgresClient {
    /// Builds the pool and proves it with one connection, backing off
    /// linearly between attempts.
    pub async fn new(settings: PostgresSettings) -> anyhow::Result<Self> {
        info!(
            "Connecting to PostgreSQL at {}:{}/{}",
            settings.host, settings.port, settings.database
        );

        let pool = build_pool(&settings)?;
        let mut attempt = 1;

        loop {
            match pool.get().await {
                Ok(_conn) => {
                    info!("Connected to PostgreSQL (pool size {})", settings.pool_size);
                    return Ok(Self { pool });
                },
                Err(e) if attempt >= CONNECT_ATTEMPTS => {
                    return Err(e).with_context(|| {
                        format!("Failed to connect to PostgreSQL after {} attempts", attempt)
                    });
                },
                Err(e) => {
                    let delay = CONNECT_BACKOFF * attempt;
                    warn!(
                        "PostgreSQL connection attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, CONNECT_ATTEMPTS, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
            }
        }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        let client = self.pool.get().await?;
        let statements = migration_statements(SCHEMA);

        for stmt in &statements {
            client
                .batch_execute(stmt)
                .await
                .with_context(|| format!("Migration statement failed: {}", stmt))?;
        }

        info!("Applied {} PostgreSQL schema statements", statements.len());
        Ok(())
    }
}
