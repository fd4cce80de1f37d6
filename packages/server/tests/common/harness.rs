//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is started for the whole test run and migrated
//! once; every test then opens its own small pool against it. Tests share
//! the data set, so fixtures generate unique usernames and search-scoped
//! titles instead of truncating tables.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::ApiClient;

/// The shared container and its connection string. Held in a static so the
/// container outlives every test in the run.
static SHARED_PG: OnceCell<(ContainerAsync<Postgres>, String)> = OnceCell::const_new();

/// Connection string of the shared database, starting and migrating it on
/// the first call.
async fn shared_database_url() -> &'static str {
    let (_container, url) = SHARED_PG
        .get_or_init(|| async {
            bootstrap()
                .await
                .expect("Failed to start shared test database")
        })
        .await;
    url
}

async fn bootstrap() -> Result<(ContainerAsync<Postgres>, String)> {
    // Respect RUST_LOG in test output; try_init() tolerates double-init when
    // the process hosts several test binaries.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    // Raise max_connections: every test holds a pool of its own.
    let container = Postgres::default()
        .with_tag("16")
        .with_cmd(["-c", "max_connections=200"])
        .start()
        .await
        .context("Failed to start Postgres container")?;

    let url = format!(
        "postgresql://postgres:postgres@{}:{}/postgres",
        container.get_host().await?,
        container.get_host_port_ipv4(5432).await?
    );

    let pool = PgPool::connect(&url)
        .await
        .context("Failed to connect to Postgres for migrations")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok((container, url))
}

/// Per-test context over the shared database.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let api = ctx.api();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Pool closes on drop
    }
}

impl TestHarness {
    /// Open a fresh pool against the shared database, booting the container
    /// and running migrations if this is the first test to ask.
    pub async fn new() -> Result<Self> {
        let url = shared_database_url().await;

        // Keep the per-test pool small so parallel tests stay under the
        // container's connection ceiling.
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }

    /// Get an unauthenticated API client for this harness.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.db_pool.clone())
    }
}
