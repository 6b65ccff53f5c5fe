use std::collections::HashMap;

use tracing::warn;

use crate::{
    error::Result,
    sql::{
        parser::ast::{HavingPredicate, COUNT_FIELD, TOTAL_FIELD},
        types::{Record, Value},
    },
    storage::Dataset,
};

use super::Executor;

/// Member count of a grouped row: `count(*)`, falling back to `total`, else 0
pub fn count_of(row: &Record) -> Value {
    row.get(COUNT_FIELD)
        .or_else(|| row.get(TOTAL_FIELD))
        .cloned()
        .unwrap_or(Value::Integer(0))
}

/// Aggregate executor - GROUP BY with COUNT(*)
///
/// Rows are bucketed by the string form of the grouping field, buckets keep
/// first-seen order. Each output row carries the group value (as found on the
/// first member) and the member count under both `count(*)` and `total`.
pub struct Aggregate {
    source: Box<dyn Executor>,
    group_by: Option<String>,
}

impl Aggregate {
    pub fn new(source: Box<dyn Executor>, group_by: Option<String>) -> Box<Self> {
        Box::new(Self { source, group_by })
    }
}

impl Executor for Aggregate {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        let rows = self.source.execute(dataset)?;
        let field = match &self.group_by {
            Some(field) => field,
            // No GROUP BY: the entire input is one group
            None => return Ok(vec![group_row(None, rows.len())]),
        };

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(Value, usize)> = Vec::new();
        for row in &rows {
            let value = row.get(field).cloned().unwrap_or(Value::Null);
            match index.get(&value.to_string()) {
                Some(&i) => groups[i].1 += 1,
                None => {
                    index.insert(value.to_string(), groups.len());
                    groups.push((value, 1));
                }
            }
        }

        Ok(groups
            .into_iter()
            .map(|(value, count)| group_row(Some((field.as_str(), value)), count))
            .collect())
    }
}

fn group_row(key: Option<(&str, Value)>, count: usize) -> Record {
    let mut row = Record::new();
    if let Some((field, value)) = key {
        row.insert(field, value);
    }
    row.insert(COUNT_FIELD, Value::Integer(count as i64));
    row.insert(TOTAL_FIELD, Value::Integer(count as i64));
    row
}

/// HAVING executor
///
/// Only `COUNT(*) > 1` filters; any other predicate keeps every group.
pub struct Having {
    source: Box<dyn Executor>,
    predicate: HavingPredicate,
}

impl Having {
    pub fn new(source: Box<dyn Executor>, predicate: HavingPredicate) -> Box<Self> {
        Box::new(Self { source, predicate })
    }
}

impl Executor for Having {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        let rows = self.source.execute(dataset)?;
        match &self.predicate {
            HavingPredicate::CountAboveOne => Ok(rows
                .into_iter()
                .filter(|row| count_of(row).as_f64().is_some_and(|n| n > 1.0))
                .collect()),
            HavingPredicate::Unsupported(text) => {
                warn!(predicate = %text, "unsupported HAVING predicate, keeping every group");
                Ok(rows)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::Result,
        sql::{
            executor::{query::Scan, Executor},
            parser::ast::HavingPredicate,
            types::{Record, Value},
        },
        storage::{Dataset, Table},
    };

    use super::{count_of, Aggregate, Having};

    fn dataset() -> Dataset {
        let rows: Vec<Record> = [
            ("a", Value::Boolean(true)),
            ("b", Value::Boolean(false)),
            ("c", Value::Boolean(true)),
            ("d", Value::String("true".to_string())),
            ("e", Value::Integer(7)),
        ]
        .into_iter()
        .map(|(name, flag)| [("name", Value::from(name)), ("flag", flag)].into_iter().collect())
        .collect();
        Dataset::new(vec![Table::new("t", rows)])
    }

    #[test]
    fn test_aggregate_buckets_in_first_seen_order() -> Result<()> {
        let rows = Aggregate::new(Scan::new("t".to_string()), Some("flag".to_string()))
            .execute(&dataset())?;

        let groups: Vec<(Option<&Value>, Value)> =
            rows.iter().map(|r| (r.get("flag"), count_of(r))).collect();
        assert_eq!(
            groups,
            vec![
                (Some(&Value::Boolean(true)), Value::Integer(3)),
                (Some(&Value::Boolean(false)), Value::Integer(1)),
                (Some(&Value::Integer(7)), Value::Integer(1)),
            ]
        );
        assert_eq!(rows[0].get("total"), Some(&Value::Integer(3)));
        assert_eq!(rows[0].get("count(*)"), Some(&Value::Integer(3)));
        Ok(())
    }

    #[test]
    fn test_aggregate_missing_field_is_one_null_group() -> Result<()> {
        let rows = Aggregate::new(Scan::new("t".to_string()), Some("nope".to_string()))
            .execute(&dataset())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("nope"), Some(&Value::Null));
        assert_eq!(count_of(&rows[0]), Value::Integer(5));
        Ok(())
    }

    #[test]
    fn test_aggregate_whole_input() -> Result<()> {
        let rows = Aggregate::new(Scan::new("t".to_string()), None).execute(&dataset())?;
        let fields: Vec<_> = rows[0].fields().collect();
        assert_eq!(
            fields,
            vec![("count(*)", &Value::Integer(5)), ("total", &Value::Integer(5))]
        );
        Ok(())
    }

    #[test]
    fn test_having_count_above_one() -> Result<()> {
        let grouped = || Aggregate::new(Scan::new("t".to_string()), Some("flag".to_string()));

        let rows = Having::new(grouped(), HavingPredicate::CountAboveOne).execute(&dataset())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("flag"), Some(&Value::Boolean(true)));

        let rows = Having::new(grouped(), HavingPredicate::Unsupported("sum(x) > 1".to_string()))
            .execute(&dataset())?;
        assert_eq!(rows.len(), 3);

        // ungrouped rows carry no count and are dropped
        let rows = Having::new(Scan::new("t".to_string()), HavingPredicate::CountAboveOne)
            .execute(&dataset())?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_count_of_falls_back_to_total() {
        let row: Record = [("total", 4i64)].into_iter().collect();
        assert_eq!(count_of(&row), Value::Integer(4));
        assert_eq!(count_of(&Record::new()), Value::Integer(0));
    }
}
