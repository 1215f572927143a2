//! Synchronous admin client.
//!
//! Every call drives the async operation from the calling thread on the
//! client's own runtime, and the thread is parked until its one request
//! settles. The runtime's single worker thread only serves spawned tasks and
//! I/O.
//!
//! The client must be created and dropped outside of an async runtime, the
//! same restriction `reqwest::blocking` has.

use std::future::Future;

use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{AdminError, VerificationError};
use crate::journal::LoggedRequest;
use crate::types::{RequestMapping, StubMapping};

#[derive(Debug)]
pub struct AdminClient {
    inner: crate::client::AdminClient,
    runtime: tokio::runtime::Runtime,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, AdminError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("mockadmin-worker")
            .enable_all()
            .build()?;
        let inner = crate::client::AdminClient::new(config)?;
        Ok(Self { inner, runtime })
    }

    pub fn from_env() -> Result<Self, AdminError> {
        Self::new(ClientConfig::from_env()?)
    }

    fn wait<F: Future>(&self, operation: F) -> F::Output {
        self.runtime.block_on(operation)
    }

    pub fn base_url(&self) -> String {
        self.inner.base_url()
    }

    pub fn set_base_url(&self, base_url: impl Into<String>) {
        self.inner.set_base_url(base_url)
    }

    pub fn create_mapping(&self, mapping: &StubMapping) {
        self.wait(self.inner.create_mapping(mapping))
    }

    pub fn try_create_mapping(&self, mapping: &StubMapping) -> Result<(), AdminError> {
        self.wait(self.inner.try_create_mapping(mapping))
    }

    pub fn update_mapping(&self, id: Uuid, mapping: &StubMapping) {
        self.wait(self.inner.update_mapping(id, mapping))
    }

    pub fn try_update_mapping(&self, id: Uuid, mapping: &StubMapping) -> Result<(), AdminError> {
        self.wait(self.inner.try_update_mapping(id, mapping))
    }

    pub fn delete_mapping(&self, id: Uuid) {
        self.wait(self.inner.delete_mapping(id))
    }

    pub fn try_delete_mapping(&self, id: Uuid) -> Result<(), AdminError> {
        self.wait(self.inner.try_delete_mapping(id))
    }

    pub fn list_mappings(&self) -> Vec<StubMapping> {
        self.wait(self.inner.list_mappings())
    }

    pub fn try_list_mappings(&self) -> Result<Vec<StubMapping>, AdminError> {
        self.wait(self.inner.try_list_mappings())
    }

    pub fn get_mapping(&self, id: Uuid) -> Option<StubMapping> {
        self.wait(self.inner.get_mapping(id))
    }

    pub fn try_get_mapping(&self, id: Uuid) -> Result<StubMapping, AdminError> {
        self.wait(self.inner.try_get_mapping(id))
    }

    pub fn find_requests(&self, filter: &RequestMapping) -> Vec<LoggedRequest> {
        self.wait(self.inner.find_requests(filter))
    }

    pub fn try_find_requests(
        &self,
        filter: &RequestMapping,
    ) -> Result<Vec<LoggedRequest>, AdminError> {
        self.wait(self.inner.try_find_requests(filter))
    }

    pub fn count_requests(&self, filter: &RequestMapping) -> Option<usize> {
        self.wait(self.inner.count_requests(filter))
    }

    pub fn try_count_requests(&self, filter: &RequestMapping) -> Result<usize, AdminError> {
        self.wait(self.inner.try_count_requests(filter))
    }

    pub fn verify(&self, filter: &RequestMapping) -> Result<(), VerificationError> {
        self.wait(self.inner.verify(filter))
    }

    pub fn verify_count(
        &self,
        expected: usize,
        filter: &RequestMapping,
    ) -> Result<(), VerificationError> {
        self.wait(self.inner.verify_count(expected, filter))
    }

    pub fn is_server_running(&self) -> bool {
        self.wait(self.inner.is_server_running())
    }

    pub fn try_is_server_running(&self) -> Result<bool, AdminError> {
        self.wait(self.inner.try_is_server_running())
    }

    pub fn save_all_mappings(&self) {
        self.wait(self.inner.save_all_mappings())
    }

    pub fn try_save_all_mappings(&self) -> Result<(), AdminError> {
        self.wait(self.inner.try_save_all_mappings())
    }

    pub fn reset(&self) {
        self.wait(self.inner.reset())
    }

    pub fn try_reset(&self) -> Result<(), AdminError> {
        self.wait(self.inner.try_reset())
    }

    pub fn reset_all_scenarios(&self) {
        self.wait(self.inner.reset_all_scenarios())
    }

    pub fn try_reset_all_scenarios(&self) -> Result<(), AdminError> {
        self.wait(self.inner.try_reset_all_scenarios())
    }

    pub fn reset_requests(&self) {
        self.wait(self.inner.reset_requests())
    }

    pub fn try_reset_requests(&self) -> Result<(), AdminError> {
        self.wait(self.inner.try_reset_requests())
    }

    pub fn shutdown_server(&self) {
        self.wait(self.inner.shutdown_server())
    }

    pub fn try_shutdown_server(&self) -> Result<(), AdminError> {
        self.wait(self.inner.try_shutdown_server())
    }
}
