use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    ast::{ComparisonOperator, LogicalOperator, NodeKind, NodeRef},
    frame::{Cell, GroupedDataFrame, Helpers, Schema},
    Config, QueryError, QueryResult,
};

pub type Row = Vec<Cell>;

/// Rows of equal arity plus the schema naming their positions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    rows: Vec<Row>,
    schema: Schema,
}

/// WHERE predicate with its columns already resolved to positions.
enum RowPredicate {
    Compare { position: usize, op: ComparisonOperator, literal: String },
    And(Box<RowPredicate>, Box<RowPredicate>),
    Or(Box<RowPredicate>, Box<RowPredicate>),
}

impl RowPredicate {
    fn evaluate(&self, row: &[Cell]) -> QueryResult<bool> {
        match self {
            RowPredicate::Compare { position, op, literal } => Helpers::satisfies(&row[*position], *op, literal),
            RowPredicate::And(l, r) => Ok(l.evaluate(row)? && r.evaluate(row)?),
            RowPredicate::Or(l, r) => Ok(l.evaluate(row)? || r.evaluate(row)?),
        }
    }
}

impl DataFrame {
    pub fn new<S: AsRef<str>>(rows: Vec<Row>, columns: &[S], aliases: HashMap<String, String>) -> QueryResult<Self> {
        Self::from_schema(rows, Schema::new(columns, aliases)?)
    }

    /// Builds a frame from an explicit name to position map.
    pub fn from_index_map(
        rows: Vec<Row>,
        columns: IndexMap<String, usize>,
        aliases: HashMap<String, String>,
    ) -> QueryResult<Self> {
        Self::from_schema(rows, Schema::from_index_map(columns, aliases))
    }

    pub fn from_schema(rows: Vec<Row>, schema: Schema) -> QueryResult<Self> {
        Self::check_arity(&rows, &schema)?;
        Ok(Self { rows, schema })
    }

    pub(crate) fn check_arity(rows: &[Row], schema: &Schema) -> QueryResult<()> {
        let Some(first) = rows.first() else { return Ok(()) };
        let width = first.len();
        if width < schema.min_arity() {
            return Err(QueryError::InvalidFrame(format!(
                "rows have {} cells but columns need {}",
                width,
                schema.min_arity()
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(QueryError::InvalidFrame(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            )));
        }
        Ok(())
    }

    /// Ledger rows as JSON objects. Keys missing from a record read as null.
    pub fn from_json_records<S: AsRef<str>>(
        columns: &[S],
        records: &[Value],
        aliases: HashMap<String, String>,
    ) -> QueryResult<Self> {
        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let Value::Object(fields) = record else {
                return Err(QueryError::InvalidFrame(format!("record {} is not a JSON object", i)));
            };
            rows.push(
                columns.iter()
                    .map(|c| fields.get(c.as_ref()).map(Cell::from_json).unwrap_or(Cell::Null))
                    .collect(),
            );
        }
        debug!(rows = rows.len(), columns = columns.len(), "loaded json records");
        Self::new(rows, columns, aliases)
    }

    pub fn to_json_records(&self) -> Vec<Value> {
        let named: Vec<(&str, usize)> = self.schema.names()
            .into_iter()
            .filter_map(|n| self.schema.columns().get(n).map(|i| (n, *i)))
            .collect();
        self.rows.iter()
            .map(|row| {
                let mut object = Map::with_capacity(named.len());
                for (name, i) in &named {
                    object.insert(name.to_string(), row[*i].to_json());
                }
                Value::Object(object)
            })
            .collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &IndexMap<String, usize> {
        self.schema.columns()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.names()
    }

    pub fn aliases(&self) -> &HashMap<String, String> {
        self.schema.aliases()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn resolve(&self, name: &str) -> QueryResult<usize> {
        self.schema.resolve(name)
    }

    /// Values of one column in row order.
    pub fn column(&self, name: &str) -> QueryResult<Vec<&Cell>> {
        let position = self.resolve(name)?;
        Ok(self.rows.iter().map(|r| &r[position]).collect())
    }

    pub fn filter<F>(&self, predicate: F) -> DataFrame
    where
        F: Fn(&[Cell]) -> bool,
    {
        let rows = self.rows.iter().filter(|r| predicate(r)).cloned().collect();
        DataFrame { rows, schema: self.schema.clone() }
    }

    /// Keeps the rows satisfying a `WHERE_CLAUSE` (or its condition node).
    /// Only bare columns may be compared; aggregates belong in HAVING.
    pub fn filter_by(&self, condition: NodeRef<'_>, config: &Config) -> QueryResult<DataFrame> {
        let condition = match condition.kind() {
            NodeKind::WhereClause => condition.child(0)
                .ok_or_else(|| QueryError::validation(condition.label(), "a condition child"))?,
            _ => condition,
        };
        let predicate = self.compile(condition, config)?;

        let mut rows = Vec::new();
        for row in &self.rows {
            if predicate.evaluate(row)? {
                rows.push(row.clone());
            }
        }
        debug!(before = self.rows.len(), after = rows.len(), "where");
        Ok(DataFrame { rows, schema: self.schema.clone() })
    }

    fn compile(&self, node: NodeRef<'_>, config: &Config) -> QueryResult<RowPredicate> {
        match node.kind() {
            NodeKind::FilterItem => {
                let (operand, op, literal) = Helpers::filter_parts(node)?;
                if !matches!(operand.kind(), NodeKind::Column) {
                    return Err(QueryError::validation(node.label(), "a COLUMN operand outside HAVING"));
                }
                let position = self.resolve(Helpers::column_name(operand)?)?;
                let literal = Helpers::strip_quotes(literal, &config.literal_quotes).to_string();
                Ok(RowPredicate::Compare { position, op, literal })
            }
            NodeKind::LogicalOperation(operator) => {
                let (left, right) = Helpers::binary_operands(node, *operator)?;
                let left = self.compile(left, config)?;
                let right = self.compile(right, config)?;
                Ok(match operator {
                    LogicalOperator::And => RowPredicate::And(Box::new(left), Box::new(right)),
                    LogicalOperator::Or => RowPredicate::Or(Box::new(left), Box::new(right)),
                })
            }
            _ => Err(QueryError::validation(node.label(), "FILTER_ITEM or LOGICAL_OPERATION")),
        }
    }

    /// Reorders or narrows the columns; rows keep their order.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> QueryResult<DataFrame> {
        let mut positions = Vec::with_capacity(names.len());
        let mut canonical = Vec::with_capacity(names.len());
        for name in names {
            let (column, position) = self.schema.canonical(name.as_ref())?;
            positions.push(position);
            canonical.push(column.to_string());
        }
        let rows = self.rows.iter()
            .map(|r| positions.iter().map(|p| r[*p].clone()).collect())
            .collect();
        DataFrame::from_schema(rows, Schema::projected(&canonical, self.schema.aliases().clone()))
    }

    pub fn group_by<S: AsRef<str>>(&self, names: &[S]) -> QueryResult<GroupedDataFrame> {
        let positions = names.iter()
            .map(|n| self.resolve(n.as_ref()))
            .collect::<QueryResult<Vec<_>>>()?;
        self.group_by_positions(positions)
    }

    pub fn group_by_positions(&self, positions: Vec<usize>) -> QueryResult<GroupedDataFrame> {
        GroupedDataFrame::from_schema(positions, self.rows.clone(), self.schema.clone())
    }
}
