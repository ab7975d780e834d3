use std::sync::Arc;

use tracing::info;

use super::schema::AdapterConfig;
use crate::catalog::CatalogResult;
use crate::context::DialectContext;
use crate::executor::{Error as ExecutorError, SqlxExecutor};

/// Connect to the configured server and set up a context for it
pub async fn build_context(config: &AdapterConfig) -> CatalogResult<DialectContext> {
    let executor = SqlxExecutor::try_new(
        &config.connection.dsn,
        config.connection.max_connections,
    )
    .await
    .map_err(ExecutorError::from)?;

    let default_schema = config.default_schema_name();
    let mut context = DialectContext::new(Arc::new(executor), &default_schema)
        .with_max_tables(config.cache.max_tables);

    if let Some(version) = config.connection.server_version {
        context = context.with_server_version(version)?;
        info!("Using the catalog layout of server version {version}");
    }

    info!("Connected, unqualified table names resolve to owner {default_schema:?}");
    Ok(context)
}
