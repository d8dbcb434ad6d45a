//! Defensive validation of raw generator output
//!
//! The generator is asked for a strict shape but is not trusted to deliver
//! it. This module is the only path by which generator output may reach
//! storage or the caller: structural violations are rejected with a precise
//! error, and `packed` is unconditionally normalized to false.

use serde_json::Value;

use crate::error::PackmateError;
use crate::models::{PackingItem, PackingListContent};

/// Parse and normalize raw generator text into [`PackingListContent`].
///
/// Structural integrity only: the prompt-side advisory limits (category and
/// item counts) are not re-enforced, and quantities are accepted as any JSON
/// number. `packed` is overwritten to false regardless of what the generator
/// produced.
pub fn validate_packing_list(raw: &str) -> Result<PackingListContent, PackmateError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|_| PackmateError::malformed_output(raw))?;

    let Value::Object(map) = parsed else {
        return Err(PackmateError::malformed_output(raw));
    };

    let mut content = PackingListContent::new();
    for (category, value) in map {
        let Value::Array(entries) = value else {
            return Err(PackmateError::invalid_category(category));
        };

        let mut items = Vec::with_capacity(entries.len());
        for entry in &entries {
            items.push(validate_item(&category, entry)?);
        }
        content.insert(category, items);
    }

    Ok(content)
}

fn validate_item(category: &str, entry: &Value) -> Result<PackingItem, PackmateError> {
    let Some(fields) = entry.as_object() else {
        return Err(PackmateError::invalid_item(category));
    };

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PackmateError::invalid_item(category))?;

    let quantity = fields
        .get("quantity")
        .and_then(Value::as_f64)
        .ok_or_else(|| PackmateError::invalid_item(category))?;

    // Hard normalization: whatever the generator claimed, a fresh list is
    // entirely unpacked
    Ok(PackingItem {
        name: name.to_string(),
        quantity,
        packed: false,
    })
}
