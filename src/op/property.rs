use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::foundation::error::{PixgraphError, PixgraphResult};

fn to_object<T: Serialize>(params: &T) -> PixgraphResult<serde_json::Map<String, Value>> {
    match serde_json::to_value(params).map_err(|e| PixgraphError::Other(e.into()))? {
        Value::Object(map) => Ok(map),
        other => Err(PixgraphError::validation(format!(
            "parameters must serialize to an object, got {other}"
        ))),
    }
}

/// All parameters of an operation as a JSON object.
pub(crate) fn all<T: Serialize>(params: &T) -> PixgraphResult<Value> {
    to_object(params).map(Value::Object)
}

/// Read one parameter by key.
pub(crate) fn get<T: Serialize>(params: &T, key: &str) -> PixgraphResult<Value> {
    let mut map = to_object(params)?;
    map.remove(key)
        .ok_or_else(|| PixgraphError::validation(format!("unknown property {key:?}")))
}

/// Replace one parameter by key.
///
/// The updated parameter set is deserialized and validated as a whole; on error `params` is left
/// untouched.
pub(crate) fn set<T, F>(params: &mut T, key: &str, value: Value, validate: F) -> PixgraphResult<()>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&T) -> PixgraphResult<()>,
{
    let mut map = to_object(params)?;
    if !map.contains_key(key) {
        return Err(PixgraphError::validation(format!("unknown property {key:?}")));
    }
    map.insert(key.to_string(), value);
    let next: T = serde_json::from_value(Value::Object(map))
        .map_err(|e| PixgraphError::validation(format!("property {key:?}: {e}")))?;
    validate(&next)?;
    *params = next;
    Ok(())
}
