use tracing::warn;

use crate::{
    error::{Error, Result},
    sql::{
        executor::agg::count_of,
        parser::ast::{Expression, OrderDirection, Predicate, SelectItem, COUNT_FIELD},
        types::{Record, Value},
    },
    storage::Dataset,
};

use super::Executor;

/// Table scan executor - copies the table's rows in insertion order
pub struct Scan {
    table_name: String,
}

impl Scan {
    pub fn new(table_name: String) -> Box<Self> {
        Box::new(Self { table_name })
    }
}

impl Executor for Scan {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        dataset
            .get(&self.table_name)
            .map(|table| table.rows.clone())
            .ok_or_else(|| Error::Internal(format!("table {} does not exist", self.table_name)))
    }
}

/// WHERE executor
///
/// An unsupported predicate keeps every record, so a partially correct
/// query still shows the player some data.
pub struct Filter {
    source: Box<dyn Executor>,
    predicate: Predicate,
}

impl Filter {
    pub fn new(source: Box<dyn Executor>, predicate: Predicate) -> Box<Self> {
        Box::new(Self { source, predicate })
    }
}

impl Executor for Filter {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        let rows = self.source.execute(dataset)?;
        if let Predicate::Unsupported(text) = &self.predicate {
            warn!(predicate = %text, "unsupported WHERE predicate, keeping every record");
            return Ok(rows);
        }
        Ok(rows
            .into_iter()
            .filter(|row| eval_predicate(&self.predicate, row))
            .collect())
    }
}

fn eval_predicate(predicate: &Predicate, row: &Record) -> bool {
    match predicate {
        Predicate::Equals { field, value } => row.get(field) == Some(value),
        Predicate::Between { field, min, max } => row
            .get(field)
            .and_then(Value::as_f64)
            .is_some_and(|v| v >= *min as f64 && v <= *max as f64),
        Predicate::Unsupported(_) => true,
    }
}

/// ORDER BY executor - stable sort on a single field
pub struct Order {
    source: Box<dyn Executor>,
    order_by: (String, OrderDirection),
}

impl Order {
    pub fn new(source: Box<dyn Executor>, order_by: (String, OrderDirection)) -> Box<Self> {
        Box::new(Self { source, order_by })
    }
}

impl Executor for Order {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        let mut rows = self.source.execute(dataset)?;
        let (field, direction) = &self.order_by;
        // Rows missing the field compare as Null, which is equal to everything
        rows.sort_by(|a, b| {
            let x = a.get(field).unwrap_or(&Value::Null);
            let y = b.get(field).unwrap_or(&Value::Null);
            let o = x.sort_cmp(y);
            match direction {
                OrderDirection::Asc => o,
                OrderDirection::Desc => o.reverse(),
            }
        });
        Ok(rows)
    }
}

/// Projection executor - keeps the requested columns, applying aliases
pub struct Projection {
    source: Box<dyn Executor>,
    exprs: Vec<SelectItem>,
}

impl Projection {
    pub fn new(source: Box<dyn Executor>, exprs: Vec<SelectItem>) -> Box<Self> {
        Box::new(Self { source, exprs })
    }
}

impl Executor for Projection {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>> {
        let Projection { source, exprs } = *self;
        let rows = source.execute(dataset)?;
        Ok(rows.iter().map(|row| project(&exprs, row)).collect())
    }
}

fn project(exprs: &[SelectItem], row: &Record) -> Record {
    let mut out = Record::new();
    for SelectItem { expr, alias } in exprs {
        let (name, value) = match expr {
            Expression::Wildcard => {
                for (name, value) in row.fields() {
                    out.insert(name, value.clone());
                }
                continue;
            }
            Expression::CountAll => (COUNT_FIELD, count_of(row)),
            Expression::Field(name) | Expression::Raw(name) => {
                (name.as_str(), row.get(name).cloned().unwrap_or(Value::Null))
            }
        };
        out.insert(alias.as_deref().unwrap_or(name), value);
    }
    out
}
