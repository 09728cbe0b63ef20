//! Tool: calculate_zunda. How many zunda-mochi a party needs.

use serde_json::{json, Map, Value};

use zundamon::PeoplePolicy;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub const NAME: &str = "calculate_zunda";

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some("ずんだもちの必要量を計算するのだ".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "people": { "type": "integer", "description": "人数" }
            },
            "required": ["people"]
        }),
    }
}

pub fn execute(args: &Map<String, Value>, policy: PeoplePolicy) -> McpResult<ToolCallResult> {
    tracing::info!("Zunda-mochi calculation requested: people={:?}", args.get("people"));
    let estimate = zundamon::calculate(args.get("people"), policy)?;
    Ok(ToolCallResult::text(estimate.to_string()))
}
