use std::{cmp::Ordering, fmt::Display};

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Runtime value of a single record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Only produced for a requested field the record does not carry
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Numeric view of the value, used by BETWEEN
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Ordering used by ORDER BY.
    ///
    /// Strings compare with [`collate`], numbers numerically. Any other pairing
    /// (mixed types, booleans, nulls) is treated as equal so the stable sort
    /// leaves those rows where they were.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::String(a), Value::String(b)) => collate(a, b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Locale-style string comparison.
///
/// Primary pass ignores case and Latin accents ("Doña" sorts with "Dona"),
/// lowercase wins ties, then plain code point order keeps the result total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = a.chars().flat_map(fold).cmp(b.chars().flat_map(fold));
    primary
        .then_with(|| {
            let case = |s: &str| s.chars().map(|c| c.is_uppercase()).collect::<Vec<_>>();
            case(a).cmp(&case(b))
        })
        .then_with(|| a.cmp(b))
}

/// Base letter of a character for the primary collation pass
fn fold(c: char) -> std::char::ToLowercase {
    let base = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        c => c,
    };
    base.to_lowercase()
}

/// A single row: field names mapped to values, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    /// Sets a field, replacing an existing value in place
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v.into());
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{collate, Record, Value};

    #[test]
    fn test_collate_ignores_accents_and_case() {
        assert_eq!(collate("Doña Carmen", "Dr. Morales"), Ordering::Less);
        assert_eq!(collate("Don Alfredo", "Doña Carmen"), Ordering::Less);
        assert_eq!(collate("ana", "Beto"), Ordering::Less);
        assert_eq!(collate("Ángel", "Bruno"), Ordering::Less);
        assert_eq!(collate("ana", "Ana"), Ordering::Less);
        assert_eq!(collate("Ana", "Ana"), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_mixed_types_are_equal() {
        assert_eq!(Value::Integer(2).sort_cmp(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::from("a").sort_cmp(&Value::Integer(1)), Ordering::Equal);
        assert_eq!(Value::Boolean(true).sort_cmp(&Value::Boolean(false)), Ordering::Equal);
        assert_eq!(Value::Null.sort_cmp(&Value::Integer(1)), Ordering::Equal);
    }

    #[test]
    fn test_record_json_keeps_field_order() -> serde_json::Result<()> {
        let record: Record = serde_json::from_str(r#"{"id": 1, "name": "x", "ok": true, "w": 1.5}"#)?;
        let names: Vec<_> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "name", "ok", "w"]);
        assert_eq!(record.get("id"), Some(&Value::Integer(1)));
        assert_eq!(record.get("w"), Some(&Value::Float(1.5)));
        assert_eq!(
            serde_json::to_string(&record)?,
            r#"{"id":1,"name":"x","ok":true,"w":1.5}"#
        );
        Ok(())
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record: Record = [("a", 1i64), ("b", 2)].into_iter().collect();
        record.insert("a", Value::Integer(10));
        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields, vec![("a", &Value::Integer(10)), ("b", &Value::Integer(2))]);
    }
}
