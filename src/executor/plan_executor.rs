use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    aggregators::AggregateRegistry,
    ast::{NodeKind, NodeRef, NodeTag},
    frame::{DataFrame, Helpers, Schema},
    planner::LogicalPlan,
    Config, QueryError, QueryResult,
};

pub trait Executor {
    fn execute(&self, input: DataFrame) -> QueryResult<DataFrame>;
}

/// Runs the WHERE, GROUP BY, HAVING and SELECT clauses of a plan over a
/// frame. ORDER BY and LIMIT are left to the caller.
pub struct PlanExecutor {
    plan: LogicalPlan,
    config: Config,
    registry: Arc<AggregateRegistry>,
}

impl Executor for PlanExecutor {
    fn execute(&self, input: DataFrame) -> QueryResult<DataFrame> {
        self.run(input)
    }
}

impl PlanExecutor {
    pub fn new(plan: LogicalPlan) -> Self {
        Self { plan, config: Config::default(), registry: AggregateRegistry::shared_default() }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<AggregateRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn plan(&self) -> &LogicalPlan {
        &self.plan
    }

    fn run(&self, input: DataFrame) -> QueryResult<DataFrame> {
        self.plan.validate()?;
        let items = self.plan.select_items()?;

        let filtered = match self.plan.where_clause() {
            Some(clause) => input.filter_by(clause, &self.config)?,
            None => input,
        };
        let frame = Self::with_item_aliases(filtered, &items)?;

        let grouped = self.plan.group_by_clause().is_some()
            || self.plan.having_clause().is_some()
            || items.iter().any(|i| Self::expression(*i).is_ok_and(|e| e.tag() == NodeTag::Function));

        let output = if grouped {
            let positions = match self.plan.group_by_clause() {
                Some(clause) => clause.children()
                    .map(|c| Helpers::column_name(c).and_then(|n| frame.resolve(n)))
                    .collect::<QueryResult<Vec<_>>>()?,
                None => Vec::new(),
            };
            let mut groups = frame.group_by_positions(positions)?
                .with_config(self.config.clone())
                .with_registry(Arc::clone(&self.registry));
            if let Some(having) = self.plan.having_clause() {
                groups = groups.having(having)?;
            }
            groups.select(&items)?
        } else {
            let mut names = Vec::new();
            for item in &items {
                let expr = Self::expression(*item)?;
                match expr.kind() {
                    NodeKind::Star(_) => names.extend(frame.column_names().into_iter().map(str::to_string)),
                    _ => names.push(Helpers::column_name(expr)?.to_string()),
                }
            }
            frame.project(&names)?
        };
        debug!(plan = %self.plan.name(), rows = output.len(), grouped, "executed plan");
        Ok(output)
    }

    fn expression(item: NodeRef<'_>) -> QueryResult<NodeRef<'_>> {
        item.child(0).ok_or_else(|| QueryError::validation(item.label(), "an expression child"))
    }

    /// `SELECT amount AS a` makes `a` resolve to `amount` everywhere after
    /// WHERE; an aliased aggregate resolves to its output column. Column
    /// targets are stored by canonical name since resolution follows one
    /// alias step only.
    fn with_item_aliases(frame: DataFrame, items: &[NodeRef<'_>]) -> QueryResult<DataFrame> {
        let mut aliases: HashMap<String, String> = frame.aliases().clone();
        for item in items {
            let Some(alias) = item.child(1).and_then(|a| a.identifier_value()) else { continue };
            let expr = Self::expression(*item)?;
            let target = match expr.kind() {
                NodeKind::Column => {
                    let name = Helpers::column_name(expr)?;
                    frame.schema().canonical(name).map(|(c, _)| c).unwrap_or(name).to_string()
                }
                NodeKind::Function => Helpers::function_column_name(expr)?,
                _ => continue,
            };
            aliases.insert(alias.to_string(), target);
        }
        let schema = Schema::from_index_map(frame.columns().clone(), aliases);
        DataFrame::from_schema(frame.into_rows(), schema)
    }
}
