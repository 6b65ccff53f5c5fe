//! Execution plans: a chain of nodes, one per clause, rooted at a table scan

use crate::{
    error::Result,
    sql::{
        executor::{Executor, join::SpecialRule},
        parser::ast::{HavingPredicate, OrderDirection, Predicate, SelectItem, SelectStatement},
        types::Record,
    },
    storage::Dataset,
};

mod planner;

pub use planner::Planner;

/// Execution plan node
#[derive(Debug)]
pub enum Node {
    /// Reads every row of a table in insertion order
    Scan { table_name: String },
    /// WHERE
    Filter {
        source: Box<Node>,
        predicate: Predicate,
    },
    /// GROUP BY + COUNT; `group_by: None` counts the whole input as one group
    Aggregate {
        source: Box<Node>,
        group_by: Option<String>,
    },
    /// HAVING
    Having {
        source: Box<Node>,
        predicate: HavingPredicate,
    },
    /// ORDER BY
    Order {
        source: Box<Node>,
        order_by: (String, OrderDirection),
    },
    /// Replaces the rows with the output of a fixed statement pattern
    Override {
        source: Box<Node>,
        rule: &'static SpecialRule,
    },
    /// Column selection
    Projection {
        source: Box<Node>,
        exprs: Vec<SelectItem>,
    },
}

/// Execution plan
#[derive(Debug)]
pub struct Plan(pub Node);

impl Plan {
    /// Builds a plan from a parsed statement
    pub fn build(stmt: SelectStatement) -> Self {
        Planner::new().build(stmt)
    }

    /// Runs the plan against the dataset
    pub fn execute(self, dataset: &Dataset) -> Result<Vec<Record>> {
        <dyn Executor>::build(self.0).execute(dataset)
    }
}
