use serde::{Deserialize, Serialize};

use crate::sql::types::Record;

/// A named, ordered sequence of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, rows: Vec<Record>) -> Self {
        Self { name: name.into(), rows }
    }
}

/// In-memory dataset: every table the engine can read.
///
/// Built once and never mutated afterwards; table order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

impl FromIterator<Table> for Dataset {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, Table};
    use crate::sql::types::{Record, Value};

    #[test]
    fn test_dataset_lookup() {
        let row: Record = [("id", 1i64)].into_iter().collect();
        let dataset: Dataset = vec![
            Table::new("b", vec![row.clone()]),
            Table::new("a", vec![]),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.table_names(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(dataset.get("b").map(|t| t.rows.len()), Some(1));
        assert_eq!(
            dataset.get("b").and_then(|t| t.rows[0].get("id")),
            Some(&Value::Integer(1))
        );
        assert!(dataset.get("c").is_none());
    }
}
