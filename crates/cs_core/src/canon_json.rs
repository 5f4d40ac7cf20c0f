use crate::app_error::{AppError, AppResult};
use serde_json::Value;

fn canon_error(message: &str) -> AppError {
    AppError::new("CS_CANON_JSON_FAILED", "canon_json", message, false, serde_json::json!({}))
}

fn write_value(value: &Value, out: &mut String) -> AppResult<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if n.is_f64() {
                return Err(canon_error("floats are forbidden in canonical json"));
            }
            out.push_str(&n.to_string());
        }
        Value::String(s) => {
            let encoded = serde_json::to_string(s)
                .map_err(|_| canon_error("failed to encode string"))?;
            out.push_str(&encoded);
        }
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (idx, key) in keys.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                let encoded = serde_json::to_string(key)
                    .map_err(|_| canon_error("failed to encode key"))?;
                out.push_str(&encoded);
                out.push(':');
                write_value(&map[*key], out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

pub fn to_canonical_bytes(value: &Value) -> AppResult<Vec<u8>> {
    let mut out = String::new();
    write_value(value, &mut out)?;
    Ok(out.into_bytes())
}
