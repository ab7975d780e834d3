pub mod any;
pub mod binding;
pub mod interface;

pub use any::SqlxExecutor;
pub use interface::{
    CatalogRow, CatalogValue, Error, QueryExecutor, QueryParam, Result,
};
