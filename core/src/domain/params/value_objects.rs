use std::fmt;

/// A decoded request parameter.
///
/// Query strings arrive as flat `key=value` pairs; the HTTP layer folds
/// bracket notation (`ids[]=1`, `sort[name]=desc`) into arrays and maps.
/// Maps keep the order in which keys appeared in the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Scalar(String),
    Array(Vec<ParamValue>),
    Map(Vec<(String, ParamValue)>),
}

impl ParamValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        ParamValue::Scalar(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Looks up a key of a map value. Returns `None` for non-map values.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            ParamValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Scalar(s) => write!(f, "{s:?}"),
            ParamValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ParamValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?} => {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
