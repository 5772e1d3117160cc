use sortscope_core::domain::params::value_objects::ParamValue;

/// Query parameters decoded into nested values, in request order.
///
/// Handles formats like:
/// - `sort=name` (scalar)
/// - `sort[name]=desc&sort[id]=asc` (map, key order kept)
/// - `ids[]=1&ids[]=2` (array)
/// - `filter[tags][]=a` (array inside a map)
///
/// A repeated key replaces the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    entries: Vec<(String, ParamValue)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key.as_ref(), value.into());
        }
        params
    }

    /// Inserts one raw `key=value` pair, expanding bracket notation.
    pub fn insert(&mut self, key: &str, value: String) {
        let (base, path) = split_key(key);
        if base.is_empty() {
            return;
        }
        insert_path(&mut self.entries, base, &path, value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, ParamValue)> {
        self.entries.iter()
    }
}

/// `a[b][]` -> (`a`, [`b`, ``]). Keys with unbalanced brackets are taken
/// literally.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };

    let base = &key[..open];
    let mut path = Vec::new();
    let mut rest = &key[open..];

    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                path.push(&stripped[..end]);
                rest = &stripped[end + 1..];
            }
            None => return (key, Vec::new()),
        }
    }

    if !rest.is_empty() {
        return (key, Vec::new());
    }

    (base, path)
}

fn slot<'a>(entries: &'a mut Vec<(String, ParamValue)>, key: &str) -> &'a mut ParamValue {
    let index = match entries.iter().position(|(k, _)| k == key) {
        Some(index) => index,
        None => {
            entries.push((key.to_string(), ParamValue::Null));
            entries.len() - 1
        }
    };
    &mut entries[index].1
}

fn insert_path(entries: &mut Vec<(String, ParamValue)>, key: &str, path: &[&str], value: String) {
    let current = slot(entries, key);

    match path.split_first() {
        None => *current = ParamValue::Scalar(value),
        Some((&"", _)) => {
            if !matches!(current, ParamValue::Array(_)) {
                *current = ParamValue::Array(Vec::new());
            }
            if let ParamValue::Array(items) = current {
                items.push(ParamValue::Scalar(value));
            }
        }
        Some((next, rest)) => {
            if !matches!(current, ParamValue::Map(_)) {
                *current = ParamValue::Map(Vec::new());
            }
            if let ParamValue::Map(children) = current {
                insert_path(children, next, rest, value);
            }
        }
    }
}
