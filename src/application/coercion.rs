use crate::domain::errors::RequestError;
use crate::domain::value_objects::{FieldValue, FormFields};

/// Turns `key=value` tokens into an ordered, typed mapping.
///
/// Each token is split on its first `=`. Values containing a `.` are tried
/// as floats, everything else as integers; anything that fails to parse stays
/// a string. `true`, `null` and friends are never coerced.
pub fn coerce<S: AsRef<str>>(pairs: &[S]) -> Result<FormFields, RequestError> {
    let mut fields = FormFields::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| RequestError::InvalidDataPair(pair.to_string()))?;
        fields.insert(key.to_string(), coerce_value(value));
    }
    Ok(fields)
}

fn coerce_value(raw: &str) -> FieldValue {
    if raw.contains('.') {
        // Non-finite floats have no JSON form.
        match raw.parse::<f64>() {
            Ok(float) if float.is_finite() => FieldValue::Float(float),
            _ => FieldValue::Text(raw.to_string()),
        }
    } else {
        raw.parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::Text(raw.to_string()))
    }
}
