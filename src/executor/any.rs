use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{
    any::{AnyPoolOptions, AnyRow},
    AnyPool, Column, Row,
};
use tracing::debug;

use super::{
    binding::bind_named_parameters,
    interface::{CatalogRow, CatalogValue, Error, QueryExecutor, QueryParam, Result},
};

/// Executor backed by a sqlx `Any` pool. The driver is picked from the DSN scheme,
/// so any engine sqlx can reach through its installed drivers works here.
#[derive(Debug)]
pub struct SqlxExecutor {
    pub executor: AnyPool,
}

impl SqlxExecutor {
    pub async fn try_new(
        dsn: &str,
        max_connections: u32,
    ) -> std::result::Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();

        // Connections are kept for the pool's lifetime: session state such as
        // attached databases must survive between catalog queries
        let pool = AnyPoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(dsn)
            .await?;

        Ok(Self { executor: pool })
    }

    pub fn interpret_row(row: &AnyRow) -> Result<CatalogRow> {
        let mut values = Vec::with_capacity(row.len());

        for column in row.columns() {
            let index = column.ordinal();
            let value = if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
                v.into()
            } else if let Ok(v) = row.try_get::<Option<String>, _>(index) {
                v.into()
            } else if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
                v.map_or(CatalogValue::Null, CatalogValue::Float)
            } else {
                return Err(Error::MalformedRow {
                    reason: format!("can't decode column {:?}", column.name()),
                });
            };

            values.push((column.name().to_string(), value));
        }

        Ok(CatalogRow::new(values))
    }
}

#[async_trait]
impl QueryExecutor for SqlxExecutor {
    async fn fetch_all(
        &self,
        sql: &str,
        params: &[QueryParam<'_>],
    ) -> Result<Vec<CatalogRow>, Error> {
        let (sql, values) = bind_named_parameters(sql, params)?;
        debug!("Executing catalog query with {} bound parameter(s)", values.len());

        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }

        let rows: Vec<AnyRow> = query.fetch(&self.executor).try_collect().await?;
        rows.iter().map(Self::interpret_row).collect()
    }
}
