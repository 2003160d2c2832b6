//! Collections of operations executed together

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operation::{Operation, OperationResult};
use crate::api::client::ClassoreClient;

/// An ordered collection of operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operations {
    operations: Vec<Operation>,
}

impl Operations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn create(mut self, resource: impl Into<String>, data: Value) -> Self {
        self.operations.push(Operation::create(resource, data));
        self
    }

    pub fn update(mut self, resource: impl Into<String>, id: impl Into<String>, data: Value) -> Self {
        self.operations.push(Operation::update(resource, id, data));
        self
    }

    pub fn delete(mut self, resource: impl Into<String>, id: impl Into<String>) -> Self {
        self.operations.push(Operation::delete(resource, id));
        self
    }

    pub fn publish(mut self, resource: impl Into<String>, id: impl Into<String>) -> Self {
        self.operations.push(Operation::publish(resource, id));
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Execute in order, one request at a time, stopping at the first error.
    /// Order matters when later payloads reference earlier server ids.
    pub async fn execute(&self, client: &ClassoreClient) -> anyhow::Result<Vec<OperationResult>> {
        let mut results = Vec::with_capacity(self.operations.len());
        for operation in &self.operations {
            results.push(operation.execute(client).await?);
        }
        Ok(results)
    }

    /// Execute every operation concurrently. Only safe for independent
    /// operations.
    pub async fn execute_parallel(&self, client: &ClassoreClient) -> anyhow::Result<Vec<OperationResult>> {
        if self.operations.is_empty() {
            return Ok(Vec::new());
        }

        let mut handles = Vec::with_capacity(self.operations.len());
        for operation in self.operations.clone() {
            let client = client.clone();
            handles.push(tokio::spawn(async move { operation.execute(&client).await }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await??);
        }
        Ok(results)
    }
}

impl From<Operation> for Operations {
    fn from(operation: Operation) -> Self {
        Self {
            operations: vec![operation],
        }
    }
}

impl From<Vec<Operation>> for Operations {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl IntoIterator for Operations {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
