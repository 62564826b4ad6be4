//! Mock NDBC client for running without network access.
//!
//! Loads a station list and sample observations from JSON files and serves
//! them as if they were live responses.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::domain::{BuoySnapshot, Source, StationId};

use super::error::NdbcError;

/// Mock NDBC client that serves data from a directory.
///
/// Expects `sources.json` (an object mapping source name to a list of
/// station ids) and one `stations/{ID}.json` file per station that should
/// resolve. Stations listed without a file behave like stations NDBC has
/// no realtime data for.
#[derive(Debug, Clone)]
pub struct MockNdbcClient {
    sources: Arc<Vec<Source>>,
    stations: Arc<HashMap<StationId, BuoySnapshot>>,
}

impl MockNdbcClient {
    /// Create a new mock client by loading JSON files from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, NdbcError> {
        let data_dir = data_dir.as_ref();

        let sources_path = data_dir.join("sources.json");
        let json = std::fs::read_to_string(&sources_path).map_err(|e| NdbcError::Mock {
            message: format!("Failed to read {:?}: {}", sources_path, e),
        })?;
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&json).map_err(|e| NdbcError::Mock {
                message: format!("Failed to parse {:?}: {}", sources_path, e),
            })?;

        let mut sources = Vec::with_capacity(raw.len());
        for (name, ids) in raw {
            let stations = ids
                .iter()
                .map(|id| StationId::parse(id))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| NdbcError::Mock {
                    message: format!("Invalid station in source {:?}: {}", name, e),
                })?;
            sources.push(Source::new(name, stations));
        }

        let mut stations = HashMap::new();
        let stations_dir = data_dir.join("stations");
        if stations_dir.is_dir() {
            let entries = std::fs::read_dir(&stations_dir).map_err(|e| NdbcError::Mock {
                message: format!("Failed to read {:?}: {}", stations_dir, e),
            })?;

            for entry in entries {
                let entry = entry.map_err(|e| NdbcError::Mock {
                    message: format!("Failed to read directory entry: {}", e),
                })?;

                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }

                let json = std::fs::read_to_string(&path).map_err(|e| NdbcError::Mock {
                    message: format!("Failed to read {:?}: {}", path, e),
                })?;
                let snapshot: BuoySnapshot =
                    serde_json::from_str(&json).map_err(|e| NdbcError::Mock {
                        message: format!("Failed to parse {:?}: {}", path, e),
                    })?;

                stations.insert(snapshot.station.clone(), snapshot);
            }
        }

        Ok(Self {
            sources: Arc::new(sources),
            stations: Arc::new(stations),
        })
    }

    /// Mimics `NdbcClient::fetch_sources`.
    pub async fn fetch_sources(&self) -> Result<Vec<Source>, NdbcError> {
        Ok(self.sources.as_ref().clone())
    }

    /// Mimics `NdbcClient::fetch_latest`.
    pub async fn fetch_latest(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        self.stations
            .get(station)
            .cloned()
            .ok_or_else(|| NdbcError::NotFound(station.to_string()))
    }

    /// Number of stations with sample observations.
    pub fn observation_count(&self) -> usize {
        self.stations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path) {
        std::fs::write(
            dir.join("sources.json"),
            r#"{"Alpha Group": ["101", "102"], "Ships": ["900"]}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.join("stations")).unwrap();
        std::fs::write(
            dir.join("stations").join("101.json"),
            r#"{"station": "101", "observed_at": null, "measurements": {"WSPD": 4.5}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("stations").join("README.txt"), "ignored").unwrap();
    }

    #[tokio::test]
    async fn load_mock_data() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let client = MockNdbcClient::new(dir.path()).unwrap();
        let sources = client.fetch_sources().await.unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "Alpha Group");
        assert_eq!(sources[0].stations.len(), 2);
        assert_eq!(client.observation_count(), 1);
    }

    #[tokio::test]
    async fn known_station_resolves() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let client = MockNdbcClient::new(dir.path()).unwrap();
        let snapshot = client
            .fetch_latest(&StationId::parse("101").unwrap())
            .await
            .unwrap();
        assert_eq!(snapshot.measurement("WSPD"), Some(4.5));
    }

    #[tokio::test]
    async fn station_without_file_is_not_found() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let client = MockNdbcClient::new(dir.path()).unwrap();
        let result = client.fetch_latest(&StationId::parse("102").unwrap()).await;
        assert!(matches!(result, Err(NdbcError::NotFound(_))));
    }

    #[test]
    fn missing_directory_is_error() {
        let result = MockNdbcClient::new("/nonexistent/mock/data");
        assert!(matches!(result, Err(NdbcError::Mock { .. })));
    }

    #[test]
    fn invalid_station_id_is_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("sources.json"), r#"{"A": ["not valid"]}"#).unwrap();

        let result = MockNdbcClient::new(dir.path());
        assert!(matches!(result, Err(NdbcError::Mock { .. })));
    }
}
