use crate::sql::types::Value;

/// Field name under which grouping stores the member count
pub const COUNT_FIELD: &str = "count(*)";
/// Synonym of [`COUNT_FIELD`], so `COUNT(*) as total` and bare `total` both resolve
pub const TOTAL_FIELD: &str = "total";

/// A parsed SELECT statement: one optional entry per supported clause
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Normalized statement text (lowercase, single spaces)
    pub source: String,
    /// Requested columns; a lone `Wildcard` item when none were given
    pub columns: Vec<SelectItem>,
    pub from: FromItem,
    pub where_clause: Option<Predicate>,
    /// GROUP BY field (None means no grouping)
    pub group_by: Option<String>,
    pub having: Option<HavingPredicate>,
    pub order_by: Option<(String, OrderDirection)>,
}

impl SelectStatement {
    /// True for `SELECT *` (or no column list at all)
    pub fn is_wildcard(&self) -> bool {
        matches!(self.columns.as_slice(), [SelectItem { expr: Expression::Wildcard, .. }])
    }

    /// True when every requested column is `COUNT(*)`
    pub fn is_count_only(&self) -> bool {
        !self.columns.is_empty()
            && self.columns.iter().all(|c| c.expr == Expression::CountAll)
    }
}

/// One entry of the column list with its optional `as` alias
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expression,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Expression, alias: Option<String>) -> Self {
        Self { expr, alias }
    }
}

/// Column expressions the projection knows how to resolve
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `*`
    Wildcard,
    /// Field reference, table qualifier already stripped
    Field(String),
    /// `COUNT(*)`
    CountAll,
    /// Anything else, kept verbatim; projects as a null field named after the text
    Raw(String),
}

/// FROM clause: the target table plus whatever followed it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FromItem {
    /// Empty when the statement has no FROM clause
    pub table: String,
    pub alias: Option<String>,
    /// Raw text of an `INNER JOIN ...` tail, if present
    pub join: Option<String>,
}

/// WHERE predicates the filter evaluates. Anything else is `Unsupported`
/// and lets every record through.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = literal` for an allow-listed field/literal pair
    Equals { field: String, value: Value },
    /// `field BETWEEN min AND max`, inclusive on both ends
    Between { field: String, min: i64, max: i64 },
    Unsupported(String),
}

/// HAVING predicates
#[derive(Debug, Clone, PartialEq)]
pub enum HavingPredicate {
    /// `COUNT(*) > 1`
    CountAboveOne,
    Unsupported(String),
}

/// Sort direction (ascending or descending)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}
