use serde::Serialize;

use crate::{
    error::Result,
    sql::{
        executor::{
            agg::{Aggregate, Having},
            join::Override,
            query::{Filter, Order, Projection, Scan},
        },
        plan::Node,
        types::Record,
    },
    storage::Dataset,
};

mod agg;
pub mod join;
mod query;

/// SQL executor trait
///
/// Every executor produces a fresh row vector; tables in the dataset are only read.
pub trait Executor {
    fn execute(self: Box<Self>, dataset: &Dataset) -> Result<Vec<Record>>;
}

/// Builds an executor from a plan node
impl dyn Executor {
    pub fn build(node: Node) -> Box<dyn Executor> {
        match node {
            Node::Scan { table_name } => Scan::new(table_name),
            Node::Filter { source, predicate } => Filter::new(Self::build(*source), predicate),
            Node::Aggregate { source, group_by } => Aggregate::new(Self::build(*source), group_by),
            Node::Having { source, predicate } => Having::new(Self::build(*source), predicate),
            Node::Order { source, order_by } => Order::new(Self::build(*source), order_by),
            Node::Override { source, rule } => Override::new(Self::build(*source), rule),
            Node::Projection { source, exprs } => Projection::new(Self::build(*source), exprs),
        }
    }
}

/// Rows produced by a successful query, with a summary for the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub data: Vec<Record>,
    pub message: String,
}

impl ResultSet {
    pub fn new(data: Vec<Record>) -> Self {
        let message = format!(
            "Query executed successfully. {} record(s) found.",
            data.len()
        );
        Self { data, message }
    }
}
