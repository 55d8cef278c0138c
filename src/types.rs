use serde::{Deserialize, Serialize};

/// A source dataset: its identifier and where to download it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub name: String,
    pub url: String,
}

impl DatasetDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One row of a dataset: field names paired with values, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.set(k, v);
        }
        record
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing field in place, or appends a new one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, v)) => *v = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}
