use crate::value::Value;
use chrono::SecondsFormat;

/// Renders any value as a short human-readable string for error messages
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Array(_) => "Array".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => float_to_string(*f),
        Value::String(s) => s.clone(),
        Value::Resource(resource) => {
            format!("({} resource #{})", resource.kind(), resource.id())
        }
        Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
        Value::Callable(_) => "(Closure Object)".to_string(),
        Value::Object(object) => object
            .to_display_string()
            .unwrap_or_else(|| format!("({} Object)", object.class_name())),
    }
}

fn float_to_string(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}INF")
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
