use parking_lot::RwLock;
use tracing::debug;

use super::queries::{CatalogQueries, V11_QUERIES, V12_QUERIES, V9_QUERIES};
use super::{CatalogResult, SchemaError};
use crate::executor::QueryExecutor;

pub const VERSION_QUERY: &str = "SELECT @@version AS ver";

/// Server releases sharing one catalog layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ServerVersionFamily {
    V9,
    V11,
    /// 12, 16 and 17
    V12,
}

impl ServerVersionFamily {
    pub fn from_major(major: u32) -> CatalogResult<Self> {
        match major {
            9 => Ok(Self::V9),
            11 => Ok(Self::V11),
            12 | 16 | 17 => Ok(Self::V12),
            _ => Err(SchemaError::UnsupportedVersion {
                version: major.to_string(),
            }),
        }
    }

    /// Map a full `@@version` string such as `17.0.10.5963`
    pub fn from_version_string(version: &str) -> CatalogResult<Self> {
        let major = version
            .trim()
            .split('.')
            .next()
            .and_then(|major| major.trim().parse::<u32>().ok())
            .ok_or_else(|| SchemaError::UnsupportedVersion {
                version: version.to_string(),
            })?;

        Self::from_major(major).map_err(|_| SchemaError::UnsupportedVersion {
            version: version.to_string(),
        })
    }

    pub fn queries(&self) -> &'static CatalogQueries {
        match self {
            Self::V9 => &V9_QUERIES,
            Self::V11 => &V11_QUERIES,
            Self::V12 => &V12_QUERIES,
        }
    }
}

/// Resolves the server's version family once and remembers it until invalidated
#[derive(Debug, Default)]
pub struct VersionProbe {
    cached: RwLock<Option<ServerVersionFamily>>,
    overridden: Option<ServerVersionFamily>,
}

impl VersionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the probe query and use a fixed server major version
    pub fn with_override(major: u32) -> CatalogResult<Self> {
        let family = ServerVersionFamily::from_major(major)?;
        Ok(Self {
            cached: RwLock::new(Some(family)),
            overridden: Some(family),
        })
    }

    pub fn cached(&self) -> Option<ServerVersionFamily> {
        *self.cached.read()
    }

    pub async fn resolve(
        &self,
        executor: &dyn QueryExecutor,
    ) -> CatalogResult<ServerVersionFamily> {
        if let Some(family) = self.cached() {
            return Ok(family);
        }

        let version = executor.fetch_scalar(VERSION_QUERY, &[]).await?;
        let version = version.to_string();
        let family = ServerVersionFamily::from_version_string(&version)?;
        debug!("Server version {version:?} uses the {family} catalog layout");

        *self.cached.write() = Some(family);
        Ok(family)
    }

    /// Forget the resolved family; an override is reinstated instead
    pub fn invalidate(&self) {
        *self.cached.write() = self.overridden;
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::testutils::MockExecutor;

    #[rstest]
    #[case("9.0.2.3951", ServerVersionFamily::V9)]
    #[case("11.0.1.2044", ServerVersionFamily::V11)]
    #[case("12.0.1.3152", ServerVersionFamily::V12)]
    #[case("16.0.0.2546", ServerVersionFamily::V12)]
    #[case(" 17.0.10.5963", ServerVersionFamily::V12)]
    #[case("17", ServerVersionFamily::V12)]
    fn test_from_version_string(#[case] version: &str, #[case] expected: ServerVersionFamily) {
        assert_eq!(
            ServerVersionFamily::from_version_string(version).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case("10.0.1.4310")]
    #[case("8.0.3")]
    #[case("")]
    #[case("Adaptive Server Anywhere")]
    fn test_unsupported_version(#[case] version: &str) {
        match ServerVersionFamily::from_version_string(version) {
            Err(SchemaError::UnsupportedVersion { version: reported }) => {
                assert_eq!(reported, version)
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_caches_the_family() {
        let executor = MockExecutor::new().with_version("16.0.0.2546");
        let probe = VersionProbe::new();

        assert_eq!(probe.cached(), None);
        assert_eq!(
            probe.resolve(&executor).await.unwrap(),
            ServerVersionFamily::V12
        );
        assert_eq!(
            probe.resolve(&executor).await.unwrap(),
            ServerVersionFamily::V12
        );
        assert_eq!(executor.executed_queries(), vec![VERSION_QUERY]);

        probe.invalidate();
        assert_eq!(probe.cached(), None);
        probe.resolve(&executor).await.unwrap();
        assert_eq!(executor.executed_queries().len(), 2);
    }

    #[tokio::test]
    async fn test_override_skips_the_query() {
        let executor = MockExecutor::new();
        let probe = VersionProbe::with_override(9).unwrap();

        assert_eq!(
            probe.resolve(&executor).await.unwrap(),
            ServerVersionFamily::V9
        );
        probe.invalidate();
        assert_eq!(probe.cached(), Some(ServerVersionFamily::V9));
        assert!(executor.executed_queries().is_empty());

        assert!(matches!(
            VersionProbe::with_override(13),
            Err(SchemaError::UnsupportedVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_server() {
        let executor = MockExecutor::new().with_version("10.0.1.4310");
        let probe = VersionProbe::new();

        assert!(matches!(
            probe.resolve(&executor).await,
            Err(SchemaError::UnsupportedVersion { .. })
        ));
        assert_eq!(probe.cached(), None);
    }
}
