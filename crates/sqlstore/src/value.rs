use serde::Serialize;
use serde_json::{Number, Value};

/// A single SQLite value, one variant per storage class.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(#[serde(with = "hex")] Vec<u8>),
}

impl ScalarValue {
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Null => Value::Null,
            ScalarValue::Integer(v) => Value::from(*v),
            ScalarValue::Real(v) => Number::from_f64(*v).map(Value::Number).unwrap_or(Value::Null),
            ScalarValue::Text(s) => Value::String(s.clone()),
            ScalarValue::Blob(b) => Value::String(hex::encode(b)),
        }
    }

    /// SQL literal rendering, used when showing sample rows to the model.
    pub fn sql_literal(&self) -> String {
        match self {
            ScalarValue::Null => "NULL".to_string(),
            ScalarValue::Integer(v) => v.to_string(),
            ScalarValue::Real(v) => format!("{v:?}"),
            ScalarValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            ScalarValue::Blob(b) => format!("X'{}'", hex::encode(b)),
        }
    }
}

/// Double-quote an identifier for SQLite.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
