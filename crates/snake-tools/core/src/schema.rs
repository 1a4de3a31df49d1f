//! JSON Schema generation for tool inputs and outputs.
//!
//! Schemas are generated once per type (Draft 2020-12) and cached per thread.

use schemars::generate::SchemaSettings;
use schemars::{JsonSchema, Schema};
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

thread_local! {
    static CACHE_FOR_TYPE: RefCell<HashMap<TypeId, Arc<Schema>>> = RefCell::new(HashMap::new());
}

fn settings() -> SchemaSettings {
    SchemaSettings::draft2020_12()
}

/// Generate (or fetch) the cached root schema for `T`.
pub fn cached_schema_for<T: JsonSchema + 'static>() -> Arc<Schema> {
    CACHE_FOR_TYPE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(x) = cache.get(&TypeId::of::<T>()) {
            return Arc::clone(x);
        }
        let root = settings().into_generator().into_root_schema_for::<T>();
        let arc = Arc::new(root);
        cache.insert(TypeId::of::<T>(), Arc::clone(&arc));
        arc
    })
}

/// Schema for `T` if its root type is `object`, as MCP requires for output schemas.
pub fn object_schema_for<T: JsonSchema + 'static>() -> Result<Arc<Schema>, String> {
    let root = cached_schema_for::<T>();
    let json = serde_json::to_value(root.as_ref()).map_err(|e| e.to_string())?;
    match json.get("type") {
        Some(serde_json::Value::String(t)) if t == "object" => Ok(root),
        Some(serde_json::Value::String(t)) => Err(format!(
            "MCP requires output_schema root type 'object', found '{t}'"
        )),
        None if json.get("properties").is_some() => Ok(root),
        None => Err("Schema missing 'type'; output_schema must have root type 'object'".to_string()),
        Some(other) => Err(format!(
            "Unexpected 'type' format: {other:?}; expected string 'object'"
        )),
    }
}
