//! Static resource definitions.

use crate::types::ResourceDefinition;

pub const GREETING_URI: &str = "zundamon://greeting";

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: GREETING_URI.to_string(),
        name: zundamon::GREETING_NAME.to_string(),
        description: Some(zundamon::GREETING_DESCRIPTION.to_string()),
        mime_type: Some("text/plain".to_string()),
    }]
}
