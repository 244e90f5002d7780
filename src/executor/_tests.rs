#[cfg(test)]
pub mod fixtures {
    use std::collections::HashMap;

    use serde_json::json;

    use crate::frame::DataFrame;

    pub const COLUMNS: [&str; 6] = ["id", "sender", "receiver", "amount", "asset", "status"];

    pub fn transactions() -> DataFrame {
        let rows = json!([
            { "id": 1, "sender": "alice", "receiver": "bob",   "amount": 120,   "asset": "USD", "status": "settled" },
            { "id": 2, "sender": "bob",   "receiver": "carol", "amount": 15,    "asset": "USD", "status": "settled" },
            { "id": 3, "sender": "alice", "receiver": "carol", "amount": 8,     "asset": "EUR", "status": "pending" },
            { "id": 4, "sender": "carol", "receiver": "alice", "amount": 300.5, "asset": "USD", "status": "settled" },
            { "id": 5, "sender": "alice", "receiver": "dave",  "amount": 42,    "asset": "USD", "status": "settled" },
            { "id": 6, "sender": "dave",  "receiver": "alice", "amount": null,  "asset": "USD", "status": "failed"  },
            { "id": 7, "sender": "bob",   "receiver": "alice", "amount": 60,    "asset": "EUR", "status": "settled" },
            { "id": 8, "sender": "carol", "receiver": "bob",   "amount": 9,     "asset": "USD", "status": "settled" }
        ]);
        let records = rows.as_array().cloned().unwrap_or_default();
        let aliases = HashMap::from([("from".to_string(), "sender".to_string())]);
        DataFrame::from_json_records(&COLUMNS, &records, aliases).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::fixtures::transactions;
    use crate::{
        aggregators::AggregateRegistry,
        ast::{ComparisonOperator, LogicalOperator, NodeKind},
        executor::{Executor, PlanExecutor},
        frame::Cell,
        planner::{LogicalPlan, PlanBuilder},
        Config, QueryError,
    };

    // ---- plan helpers, written the way a visitor drives the builder ----

    enum Item<'a> {
        Col(&'a str),
        Aliased(&'a str, &'a str),
        Func(&'a str, Option<&'a str>),
        AliasedFunc(&'a str, Option<&'a str>, &'a str),
        Star,
    }

    fn select(b: &mut PlanBuilder, items: &[Item]) {
        b.enter(NodeKind::SelectClause);
        for item in items {
            b.enter(NodeKind::SelectItem);
            match item {
                Item::Col(c) => { b.column(c); }
                Item::Aliased(c, a) => { b.column(c); b.literal(a); }
                Item::Func(f, arg) => function(b, f, *arg),
                Item::AliasedFunc(f, arg, a) => { function(b, f, *arg); b.literal(a); }
                Item::Star => { b.star(); }
            }
            b.leave().unwrap();
        }
        b.leave().unwrap();

        b.enter(NodeKind::FromItem);
        b.enter(NodeKind::Table);
        b.literal("TRANSACTION");
        b.leave().unwrap();
        b.leave().unwrap();
    }

    fn function(b: &mut PlanBuilder, name: &str, arg: Option<&str>) {
        b.enter_function(name);
        match arg {
            Some(c) => { b.column(c); }
            None => { b.star(); }
        }
        b.leave().unwrap();
    }

    fn column_filter(b: &mut PlanBuilder, column: &str, op: ComparisonOperator, literal: &str) {
        b.enter(NodeKind::FilterItem);
        b.column(column);
        b.comparator(op);
        b.literal(literal);
        b.leave().unwrap();
    }

    fn aggregate_filter(b: &mut PlanBuilder, name: &str, arg: Option<&str>, op: ComparisonOperator, literal: &str) {
        b.enter(NodeKind::FilterItem);
        function(b, name, arg);
        b.comparator(op);
        b.literal(literal);
        b.leave().unwrap();
    }

    fn where_settled(b: &mut PlanBuilder) {
        b.enter(NodeKind::WhereClause);
        column_filter(b, "status", ComparisonOperator::Eq, "'settled'");
        b.leave().unwrap();
    }

    fn group_by(b: &mut PlanBuilder, columns: &[&str]) {
        b.enter(NodeKind::GroupByClause);
        for c in columns {
            b.column(c);
        }
        b.leave().unwrap();
    }

    fn run(plan: LogicalPlan) -> Result<Vec<serde_json::Value>, QueryError> {
        PlanExecutor::new(plan).execute(transactions()).map(|df| df.to_json_records())
    }

    // ---- end to end ----

    #[test]
    fn settled_volume_per_sender_with_having() {
        // select sender, count(*), sum(amount) from TRANSACTION
        // where status = 'settled' group by sender
        // having sum(amount) >= 100 and count(*) > 1
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Col("sender"), Item::Func("count", None), Item::Func("sum", Some("amount"))]);
        where_settled(&mut b);
        group_by(&mut b, &["sender"]);
        b.enter(NodeKind::HavingClause);
        b.enter(NodeKind::LogicalOperation(LogicalOperator::And));
        aggregate_filter(&mut b, "sum", Some("amount"), ComparisonOperator::Gte, "100");
        aggregate_filter(&mut b, "count", None, ComparisonOperator::Gt, "1");
        b.leave().unwrap();
        b.leave().unwrap();

        let rows = run(b.build().unwrap()).unwrap();
        assert_eq!(rows, vec![
            json!({ "sender": "alice", "count(*)": 2, "sum(amount)": 162 }),
            json!({ "sender": "carol", "count(*)": 2, "sum(amount)": 309.5 }),
        ]);
    }

    #[test]
    fn aggregates_without_group_by_cover_every_row() {
        // select count(*), count(amount), sum(amount), max(amount) from TRANSACTION
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[
            Item::Func("count", None),
            Item::Func("count", Some("amount")),
            Item::Func("sum", Some("amount")),
            Item::Func("max", Some("amount")),
        ]);
        let out = PlanExecutor::new(b.build().unwrap()).execute(transactions()).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(
            out.rows()[0],
            vec![Cell::Int(8), Cell::Int(8), Cell::float(554.5), Cell::float(300.5)]
        );
    }

    #[test]
    fn plain_projection_with_star_and_where() {
        // select * from TRANSACTION where amount > 100
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Star]);
        b.enter(NodeKind::WhereClause);
        column_filter(&mut b, "amount", ComparisonOperator::Gt, "100");
        b.leave().unwrap();

        let out = PlanExecutor::new(b.build().unwrap()).execute(transactions()).unwrap();
        assert_eq!(out.column_names(), vec!["id", "sender", "receiver", "amount", "asset", "status"]);
        let ids: Vec<&Cell> = out.rows().iter().map(|r| &r[0]).collect();
        assert_eq!(ids, vec![&Cell::Int(1), &Cell::Int(4)]);
    }

    #[test]
    fn select_aliases_feed_group_by_and_output_resolution() {
        // select sender as who, count(*) as n from TRANSACTION group by who
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Aliased("sender", "who"), Item::AliasedFunc("count", None, "n")]);
        group_by(&mut b, &["who"]);

        let out = PlanExecutor::new(b.build().unwrap()).execute(transactions()).unwrap();
        assert_eq!(out.column_names(), vec!["sender", "count(*)"]);
        assert_eq!(out.resolve("who").unwrap(), 0);
        assert_eq!(out.resolve("n").unwrap(), 1);
        let counts: Vec<String> = out.column("n").unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(counts, vec!["3", "2", "2", "1"]);
    }

    #[test]
    fn input_aliases_resolve_in_where_and_group_by() {
        // select from, sum(amount) from TRANSACTION where from <> 'dave' group by from
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Col("from"), Item::Func("sum", Some("amount"))]);
        b.enter(NodeKind::WhereClause);
        column_filter(&mut b, "from", ComparisonOperator::Neq, "dave");
        b.leave().unwrap();
        group_by(&mut b, &["from"]);

        let rows = run(b.build().unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], json!({ "sender": "bob", "sum(amount)": 75 }));
    }

    #[test]
    fn select_alias_of_an_input_alias_groups_by_the_column() {
        // select from as f, count(*) from TRANSACTION group by f
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Aliased("from", "f"), Item::Func("count", None)]);
        group_by(&mut b, &["f"]);

        let rows = run(b.build().unwrap()).unwrap();
        assert_eq!(rows, vec![
            json!({ "sender": "alice", "count(*)": 3 }),
            json!({ "sender": "bob",   "count(*)": 2 }),
            json!({ "sender": "carol", "count(*)": 2 }),
            json!({ "sender": "dave",  "count(*)": 1 }),
        ]);
    }

    #[test]
    fn having_or_on_grouping_key() {
        // select asset, count(*) from TRANSACTION group by asset
        // having asset = 'EUR' or count(*) >= 6
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Col("asset"), Item::Func("count", None)]);
        group_by(&mut b, &["asset"]);
        b.enter(NodeKind::HavingClause);
        b.enter(NodeKind::LogicalOperation(LogicalOperator::Or));
        column_filter(&mut b, "asset", ComparisonOperator::Eq, "'EUR'");
        aggregate_filter(&mut b, "count", None, ComparisonOperator::Gte, "6");
        b.leave().unwrap();
        b.leave().unwrap();

        let rows = run(b.build().unwrap()).unwrap();
        assert_eq!(rows, vec![
            json!({ "asset": "EUR", "count(*)": 2 }),
            json!({ "asset": "USD", "count(*)": 6 }),
        ]);
    }

    // ---- failures ----

    #[test]
    fn non_grouping_bare_column_is_rejected() {
        // select sender, amount from TRANSACTION group by sender
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Col("sender"), Item::Col("amount")]);
        group_by(&mut b, &["sender"]);
        assert_eq!(run(b.build().unwrap()).unwrap_err(), QueryError::GroupingConstraint("amount".into()));
    }

    #[test]
    fn unvalidated_plan_is_checked_before_running() {
        // where with a three-operand AND, assembled without build()
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Col("sender")]);
        b.enter(NodeKind::WhereClause);
        b.enter(NodeKind::LogicalOperation(LogicalOperator::And));
        for literal in ["1", "2", "3"] {
            column_filter(&mut b, "id", ComparisonOperator::Neq, literal);
        }
        b.leave().unwrap();
        b.leave().unwrap();

        let err = run(b.finish()).unwrap_err();
        assert!(matches!(err, QueryError::PlanValidation { .. }), "{err}");
    }

    #[test]
    fn case_sensitive_config_and_custom_registry() {
        let plan = || {
            let mut b = PlanBuilder::new("LedgerVisitor");
            select(&mut b, &[Item::Func("AVG", Some("amount"))]);
            b.build().unwrap()
        };

        let strict = PlanExecutor::new(plan()).with_config(Config::case_sensitive());
        assert_eq!(strict.execute(transactions()).unwrap_err(), QueryError::UnknownFunction("AVG".into()));

        let empty = PlanExecutor::new(plan()).with_registry(Arc::new(AggregateRegistry::new()));
        assert_eq!(empty.execute(transactions()).unwrap_err(), QueryError::UnknownFunction("AVG".into()));

        let out = PlanExecutor::new(plan()).execute(transactions()).unwrap();
        assert_eq!(out.column_names(), vec!["AVG(amount)"]);
        assert_eq!(out.rows()[0][0], Cell::float(554.5 / 7.0));
    }

    #[test]
    fn sum_over_text_is_an_error() {
        let mut b = PlanBuilder::new("LedgerVisitor");
        select(&mut b, &[Item::Func("sum", Some("asset"))]);
        assert!(matches!(
            run(b.build().unwrap()),
            Err(QueryError::NonNumericAggregate { ref function, .. }) if function == "sum"
        ));
    }
}
