use tracing::{debug, warn};

use crate::sql::{
    executor::join::SpecialRule,
    parser::ast::SelectStatement,
    plan::{Node, Plan},
};

/// Query planner - lays the clauses out in their fixed evaluation order:
/// WHERE, GROUP BY, HAVING, ORDER BY, special-case override, projection.
/// Absent clauses add no node.
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self {}
    }

    /// Builds an execution plan from a parsed statement
    pub fn build(&self, stmt: SelectStatement) -> Plan {
        let rule = SpecialRule::detect(&stmt);
        let count_only = stmt.is_count_only();
        let wildcard = stmt.is_wildcard();

        let SelectStatement {
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            ..
        } = stmt;

        if let (Some(join), None) = (&from.join, rule) {
            warn!(
                join = %join,
                alias = from.alias.as_deref().unwrap_or(&from.table),
                "joins are not supported, reading {} only",
                from.table
            );
        }

        let mut node = Node::Scan {
            table_name: from.table,
        };

        if let Some(predicate) = where_clause {
            node = Node::Filter {
                source: Box::new(node),
                predicate,
            };
        }

        // A bare COUNT(*) projection without GROUP BY aggregates the whole input
        if group_by.is_some() || count_only {
            node = Node::Aggregate {
                source: Box::new(node),
                group_by,
            };
        }

        if let Some(predicate) = having {
            node = Node::Having {
                source: Box::new(node),
                predicate,
            };
        }

        if let Some(order_by) = order_by {
            node = Node::Order {
                source: Box::new(node),
                order_by,
            };
        }

        if let Some(rule) = rule {
            node = Node::Override {
                source: Box::new(node),
                rule,
            };
        }

        if !wildcard {
            node = Node::Projection {
                source: Box::new(node),
                exprs: columns,
            };
        }

        debug!(?node, "planned statement");
        Plan(node)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::Result,
        sql::{parser::Parser, plan::{Node, Plan}},
    };

    /// Node names from the root down to the scan
    fn shape(node: &Node) -> Vec<&'static str> {
        let (name, source) = match node {
            Node::Scan { .. } => return vec!["scan"],
            Node::Filter { source, .. } => ("filter", source),
            Node::Aggregate { source, .. } => ("aggregate", source),
            Node::Having { source, .. } => ("having", source),
            Node::Order { source, .. } => ("order", source),
            Node::Override { source, .. } => ("override", source),
            Node::Projection { source, .. } => ("projection", source),
        };
        let mut names = vec![name];
        names.extend(shape(source));
        names
    }

    #[test]
    fn test_planner_fixed_order() -> Result<()> {
        let stmt = Parser::new(
            "select energia, count(*) as total from munecas_isla where id between 1 and 6 \
             group by energia having count(*) > 1 order by total desc",
        )
        .parse()?;
        let Plan(node) = Plan::build(stmt);
        assert_eq!(
            shape(&node),
            vec!["projection", "order", "having", "aggregate", "filter", "scan"]
        );
        Ok(())
    }

    #[test]
    fn test_planner_select_star_is_scan() -> Result<()> {
        let Plan(node) = Plan::build(Parser::new("select * from memorias_casa").parse()?);
        assert_eq!(shape(&node), vec!["scan"]);
        Ok(())
    }

    #[test]
    fn test_planner_count_only_aggregates() -> Result<()> {
        let Plan(node) = Plan::build(Parser::new("select count(*) from memorias_casa").parse()?);
        assert_eq!(shape(&node), vec!["projection", "aggregate", "scan"]);
        Ok(())
    }

    #[test]
    fn test_planner_join_override() -> Result<()> {
        let stmt = Parser::new(
            "SELECT m1.nombre_muneca FROM munecas_isla m1 INNER JOIN \
             (SELECT energia FROM munecas_isla WHERE energia = 'protectora') m2 ON m1.energia = m2.energia",
        )
        .parse()?;
        let Plan(node) = Plan::build(stmt);
        assert_eq!(shape(&node), vec!["projection", "override", "scan"]);
        Ok(())
    }

    #[test]
    fn test_planner_other_join_reads_base_table() -> Result<()> {
        let stmt = Parser::new("select * from munecas_isla as m inner join memorias_casa c on m.id = c.id")
            .parse()?;
        assert_eq!(stmt.from.alias, Some("m".to_string()));
        let Plan(node) = Plan::build(stmt);
        assert!(matches!(&node, Node::Scan { table_name } if table_name == "munecas_isla"));
        Ok(())
    }
}
