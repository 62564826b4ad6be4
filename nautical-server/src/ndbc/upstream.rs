//! Runtime selection between the live service and local mock data.

use crate::cache::BuoyProvider;
use crate::domain::{BuoySnapshot, Source, StationId};

use super::client::NdbcClient;
use super::error::NdbcError;
use super::mock::MockNdbcClient;

/// The provider the server was started with.
#[derive(Debug, Clone)]
pub enum Upstream {
    Live(NdbcClient),
    Mock(MockNdbcClient),
}

impl BuoyProvider for Upstream {
    async fn list_sources(&self) -> Result<Vec<Source>, NdbcError> {
        match self {
            Upstream::Live(client) => client.fetch_sources().await,
            Upstream::Mock(client) => client.fetch_sources().await,
        }
    }

    async fn fetch_station(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        match self {
            Upstream::Live(client) => client.fetch_latest(station).await,
            Upstream::Mock(client) => client.fetch_latest(station).await,
        }
    }
}

impl BuoyProvider for NdbcClient {
    async fn list_sources(&self) -> Result<Vec<Source>, NdbcError> {
        self.fetch_sources().await
    }

    async fn fetch_station(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        self.fetch_latest(station).await
    }
}

impl BuoyProvider for MockNdbcClient {
    async fn list_sources(&self) -> Result<Vec<Source>, NdbcError> {
        self.fetch_sources().await
    }

    async fn fetch_station(&self, station: &StationId) -> Result<BuoySnapshot, NdbcError> {
        self.fetch_latest(station).await
    }
}
