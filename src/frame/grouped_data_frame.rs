use std::{collections::HashMap, sync::Arc};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    aggregators::{AggregateImpl, AggregateRegistry},
    ast::{ComparisonOperator, LogicalOperator, NodeKind, NodeRef},
    frame::{Cell, DataFrame, Helpers, Row, Schema},
    Config, QueryError, QueryResult,
};

/// Cell values at the grouping positions, in grouping order.
pub type GroupKey = Vec<Cell>;

/// Groups in first-seen order.
pub type Groups = IndexMap<GroupKey, Vec<Row>>;

/// Rows partitioned by the values at `group_positions`.
///
/// Every source row lands in exactly one group. Keys compare per variant, so
/// `Int(1)` and `Text("1")` never share a group. An empty position list puts
/// all rows in a single group keyed by the empty tuple.
#[derive(Debug, Clone)]
pub struct GroupedDataFrame {
    group_positions: Vec<usize>,
    schema: Schema,
    groups: Groups,
    config: Config,
    registry: Arc<AggregateRegistry>,
}

/// Aggregate call with its function looked up and its argument resolved.
struct CompiledAggregate {
    function: Arc<dyn AggregateImpl>,
    argument: AggregateArgument,
}

enum AggregateArgument {
    Ordinals,
    Column(usize),
    Nested(Box<CompiledAggregate>),
}

impl CompiledAggregate {
    fn evaluate(&self, members: &[Row]) -> QueryResult<Cell> {
        let values: Vec<Cell> = match &self.argument {
            AggregateArgument::Ordinals => (1..=members.len()).map(Cell::from).collect(),
            AggregateArgument::Column(position) => members.iter().map(|r| r[*position].clone()).collect(),
            AggregateArgument::Nested(inner) => vec![inner.evaluate(members)?],
        };
        trace!(function = self.function.name(), values = values.len(), "aggregate");
        self.function.aggregate(&values)
    }
}

enum Projection {
    Key(usize),
    Aggregate(CompiledAggregate),
}

enum Operand {
    Key(usize),
    Aggregate(CompiledAggregate),
}

enum GroupPredicate {
    Compare { operand: Operand, op: ComparisonOperator, literal: String },
    Logical { operator: LogicalOperator, left: Box<GroupPredicate>, right: Box<GroupPredicate> },
}

type Surviving<'g> = IndexMap<&'g GroupKey, &'g Vec<Row>>;

impl GroupedDataFrame {
    pub fn new<S: AsRef<str>>(
        group_positions: Vec<usize>,
        rows: Vec<Row>,
        columns: &[S],
        aliases: HashMap<String, String>,
    ) -> QueryResult<Self> {
        Self::from_schema(group_positions, rows, Schema::new(columns, aliases)?)
    }

    pub fn from_index_map(
        group_positions: Vec<usize>,
        rows: Vec<Row>,
        columns: IndexMap<String, usize>,
        aliases: HashMap<String, String>,
    ) -> QueryResult<Self> {
        Self::from_schema(group_positions, rows, Schema::from_index_map(columns, aliases))
    }

    pub fn from_schema(group_positions: Vec<usize>, rows: Vec<Row>, schema: Schema) -> QueryResult<Self> {
        DataFrame::check_arity(&rows, &schema)?;
        let width = rows.first().map(Vec::len).unwrap_or_else(|| schema.min_arity());
        if let Some(p) = group_positions.iter().find(|p| **p >= width) {
            return Err(QueryError::InvalidFrame(format!(
                "grouping position {} is outside rows of {} cells",
                p, width
            )));
        }

        let total = rows.len();
        let mut groups = Groups::new();
        for row in rows {
            let key: GroupKey = group_positions.iter().map(|p| row[*p].clone()).collect();
            groups.entry(key).or_default().push(row);
        }
        debug!(rows = total, groups = groups.len(), positions = ?group_positions, "grouped rows");

        Ok(Self {
            group_positions,
            schema,
            groups,
            config: Config::default(),
            registry: AggregateRegistry::shared_default(),
        })
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<AggregateRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn group_positions(&self) -> &[usize] {
        &self.group_positions
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Grouped projection: one output row per non-empty group, columns in
    /// item order. Items may be `SELECT_ITEM` nodes or the bare expression
    /// nodes they wrap.
    pub fn select(&self, items: &[NodeRef<'_>]) -> QueryResult<DataFrame> {
        let mut projections = Vec::with_capacity(items.len());
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            let expr = Self::select_expression(*item)?;
            match expr.kind() {
                NodeKind::Column => {
                    let name = Helpers::column_name(expr)?;
                    let (canonical, position) = self.schema.canonical(name)?;
                    let key_index = self.key_index(position)
                        .ok_or_else(|| QueryError::GroupingConstraint(name.to_string()))?;
                    names.push(canonical.to_string());
                    projections.push(Projection::Key(key_index));
                }
                NodeKind::Function => {
                    names.push(Helpers::function_column_name(expr)?);
                    projections.push(Projection::Aggregate(self.compile_aggregate(expr)?));
                }
                NodeKind::Star(_) => return Err(QueryError::GroupingConstraint("*".to_string())),
                _ => return Err(QueryError::validation(expr.label(), "COLUMN, FUNCTION or STAR")),
            }
        }

        let mut rows = Vec::with_capacity(self.groups.len());
        for (key, members) in &self.groups {
            if members.is_empty() {
                continue;
            }
            let mut record = Vec::with_capacity(projections.len());
            for projection in &projections {
                record.push(match projection {
                    Projection::Key(i) => key[*i].clone(),
                    Projection::Aggregate(aggregate) => aggregate.evaluate(members)?,
                });
            }
            rows.push(record);
        }
        debug!(groups = self.groups.len(), rows = rows.len(), columns = ?names, "grouped select");
        DataFrame::from_schema(rows, Schema::projected(&names, self.schema.aliases().clone()))
    }

    /// Keeps the groups satisfying a `HAVING_CLAUSE` (or its condition node).
    pub fn having(&self, clause: NodeRef<'_>) -> QueryResult<GroupedDataFrame> {
        let condition = match clause.kind() {
            NodeKind::HavingClause => clause.child(0)
                .ok_or_else(|| QueryError::validation(clause.label(), "a condition child"))?,
            _ => clause,
        };
        let predicate = self.compile_predicate(condition)?;
        let surviving = self.surviving(&predicate)?;
        debug!(before = self.groups.len(), after = surviving.len(), "having");

        let groups = surviving.into_iter()
            .map(|(key, rows)| (key.clone(), rows.clone()))
            .collect();
        Ok(GroupedDataFrame {
            group_positions: self.group_positions.clone(),
            schema: self.schema.clone(),
            groups,
            config: self.config.clone(),
            registry: Arc::clone(&self.registry),
        })
    }

    fn select_expression(item: NodeRef<'_>) -> QueryResult<NodeRef<'_>> {
        match item.kind() {
            NodeKind::SelectItem => item.child(0)
                .ok_or_else(|| QueryError::validation(item.label(), "an expression child")),
            _ => Ok(item),
        }
    }

    fn key_index(&self, position: usize) -> Option<usize> {
        self.group_positions.iter().position(|p| *p == position)
    }

    fn compile_aggregate(&self, function: NodeRef<'_>) -> QueryResult<CompiledAggregate> {
        let argument = Helpers::function_argument(function)?;
        let argument = match argument.kind() {
            NodeKind::Function => AggregateArgument::Nested(Box::new(self.compile_aggregate(argument)?)),
            NodeKind::Star(_) => AggregateArgument::Ordinals,
            NodeKind::Column => AggregateArgument::Column(self.schema.resolve(Helpers::column_name(argument)?)?),
            _ => return Err(QueryError::validation(function.label(), "a COLUMN, STAR or FUNCTION argument")),
        };
        let function = self.registry.resolve(Helpers::function_name(function)?, &self.config)?;
        Ok(CompiledAggregate { function, argument })
    }

    fn compile_predicate(&self, node: NodeRef<'_>) -> QueryResult<GroupPredicate> {
        match node.kind() {
            NodeKind::FilterItem => {
                let (operand, op, literal) = Helpers::filter_parts(node)?;
                let operand = match operand.kind() {
                    NodeKind::Function => Operand::Aggregate(self.compile_aggregate(operand)?),
                    _ => {
                        let name = Helpers::column_name(operand)?;
                        self.schema.resolve(name).ok()
                            .and_then(|position| self.key_index(position))
                            .map(Operand::Key)
                            .ok_or_else(|| QueryError::GroupingConstraint(name.to_string()))?
                    }
                };
                let literal = Helpers::strip_quotes(literal, &self.config.literal_quotes).to_string();
                Ok(GroupPredicate::Compare { operand, op, literal })
            }
            NodeKind::LogicalOperation(operator) => {
                let (left, right) = Helpers::binary_operands(node, *operator)?;
                Ok(GroupPredicate::Logical {
                    operator: *operator,
                    left: Box::new(self.compile_predicate(left)?),
                    right: Box::new(self.compile_predicate(right)?),
                })
            }
            _ => Err(QueryError::validation(node.label(), "FILTER_ITEM or LOGICAL_OPERATION")),
        }
    }

    /// Each side of a logical operation is evaluated on its own. AND keeps
    /// the shared keys with the right side's rows; OR keeps every key with
    /// the left side's rows on collision.
    fn surviving(&self, predicate: &GroupPredicate) -> QueryResult<Surviving<'_>> {
        match predicate {
            GroupPredicate::Compare { operand, op, literal } => {
                let mut kept = Surviving::new();
                for (key, members) in &self.groups {
                    let value = match operand {
                        Operand::Key(i) => key[*i].clone(),
                        Operand::Aggregate(aggregate) => aggregate.evaluate(members)?,
                    };
                    if Helpers::satisfies(&value, *op, literal)? {
                        kept.insert(key, members);
                    }
                }
                Ok(kept)
            }
            GroupPredicate::Logical { operator: LogicalOperator::And, left, right } => {
                let left = self.surviving(left)?;
                let right = self.surviving(right)?;
                Ok(left.keys()
                    .filter_map(|key| right.get(key).map(|rows| (*key, *rows)))
                    .collect())
            }
            GroupPredicate::Logical { operator: LogicalOperator::Or, left, right } => {
                let mut kept = self.surviving(left)?;
                for (key, rows) in self.surviving(right)? {
                    kept.entry(key).or_insert(rows);
                }
                Ok(kept)
            }
        }
    }
}
