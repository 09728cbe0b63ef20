//! Resource lookup by URI.

use crate::types::{McpError, McpResult, ReadResourceResult, ResourceContent, ResourceDefinition};

use super::catalog::{self, GREETING_URI};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_resources() -> Vec<ResourceDefinition> {
        catalog::list_resources()
    }

    /// Exact-match read against the catalog.
    pub fn read(uri: &str) -> McpResult<ReadResourceResult> {
        let text = match uri {
            GREETING_URI => zundamon::greeting(),
            _ => {
                tracing::error!("Unknown resource: {uri}");
                return Err(McpError::ResourceNotFound(uri.to_string()));
            }
        };

        let mime_type = catalog::list_resources()
            .into_iter()
            .find(|r| r.uri == uri)
            .and_then(|r| r.mime_type);

        Ok(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type,
                text: Some(text.to_string()),
            }],
        })
    }
}
