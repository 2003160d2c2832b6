//! Single CRUD/publish operations against named admin resources

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::client::ClassoreClient;
use crate::api::endpoints;

/// One operation against a named resource (examinations, bundles, subjects,
/// chapters, chapter-modules, questions, roles, users).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new record.
    Create { resource: String, data: Value },
    /// Update an existing record.
    Update {
        resource: String,
        id: String,
        data: Value,
    },
    /// Delete a record.
    Delete { resource: String, id: String },
    /// Flip a record to published.
    Publish { resource: String, id: String },
}

/// Result of executing one [`Operation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: Operation,
    pub success: bool,
    /// Response `data`, e.g. the created record with its server id.
    pub data: Option<Value>,
    /// The server's normalized message, when one was sent.
    pub message: Option<String>,
}

impl Operation {
    pub fn create(resource: impl Into<String>, data: Value) -> Self {
        Self::Create {
            resource: resource.into(),
            data,
        }
    }

    pub fn update(resource: impl Into<String>, id: impl Into<String>, data: Value) -> Self {
        Self::Update {
            resource: resource.into(),
            id: id.into(),
            data,
        }
    }

    pub fn delete(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Delete {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn publish(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Publish {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn resource(&self) -> &str {
        match self {
            Operation::Create { resource, .. }
            | Operation::Update { resource, .. }
            | Operation::Delete { resource, .. }
            | Operation::Publish { resource, .. } => resource,
        }
    }

    /// Execute against the API. Mutations are fire-once: a failure comes
    /// back as an error without any automatic retry.
    pub async fn execute(&self, client: &ClassoreClient) -> anyhow::Result<OperationResult> {
        let envelope = match self {
            Operation::Create { resource, data } => {
                let url = endpoints::resource_collection(client.base_url(), resource);
                client.post(&url, data).await?
            }
            Operation::Update { resource, id, data } => {
                let url = endpoints::resource_record(client.base_url(), resource, id);
                client.put(&url, data).await?
            }
            Operation::Delete { resource, id } => {
                let url = endpoints::resource_record(client.base_url(), resource, id);
                client.delete(&url).await?
            }
            Operation::Publish { resource, id } => {
                let url = endpoints::resource_publish(client.base_url(), resource, id);
                client.put(&url, &Value::Object(Default::default())).await?
            }
        };

        Ok(OperationResult {
            operation: self.clone(),
            success: envelope.success,
            message: envelope.message_text(),
            data: envelope.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_carry_resource() {
        let op = Operation::create("bundles", json!({"name": "JAMB 2026"}));
        assert_eq!(op.resource(), "bundles");
        let op = Operation::publish("subjects", "abc");
        assert_eq!(op.resource(), "subjects");
    }

    #[test]
    fn operation_roundtrips_through_json() {
        let op = Operation::update("chapters", "id-1", json!({"name": "Algebra"}));
        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resource(), "chapters");
    }
}
