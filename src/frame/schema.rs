use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{QueryError, QueryResult};

/// Column names of a frame and the alias table consulted when a name does
/// not match a column directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    columns: IndexMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl Schema {
    /// Names are numbered by position.
    pub fn new<S: AsRef<str>>(names: &[S], aliases: HashMap<String, String>) -> QueryResult<Self> {
        let mut columns = IndexMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if columns.insert(name.to_string(), index).is_some() {
                return Err(QueryError::InvalidFrame(format!("duplicate column {}", name)));
            }
        }
        Ok(Self { columns, aliases })
    }

    /// Schema for a projection. A repeated name keeps its first position.
    pub fn projected<S: AsRef<str>>(names: &[S], aliases: HashMap<String, String>) -> Self {
        let mut columns = IndexMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            columns.entry(name.as_ref().to_string()).or_insert(index);
        }
        Self { columns, aliases }
    }

    pub fn from_index_map(columns: IndexMap<String, usize>, aliases: HashMap<String, String>) -> Self {
        Self { columns, aliases }
    }

    /// Direct lookup first, then through the alias table.
    pub fn resolve(&self, name: &str) -> QueryResult<usize> {
        self.canonical(name).map(|(_, index)| index)
    }

    /// Canonical column name and position for `name` or one of its aliases.
    pub fn canonical<'s>(&'s self, name: &str) -> QueryResult<(&'s str, usize)> {
        if let Some((canonical, index)) = self.columns.get_key_value(name) {
            return Ok((canonical.as_str(), *index));
        }
        self.aliases.get(name)
            .and_then(|actual| self.columns.get_key_value(actual.as_str()))
            .map(|(canonical, index)| (canonical.as_str(), *index))
            .ok_or_else(|| QueryError::ColumnNotFound(name.to_string()))
    }

    pub fn columns(&self) -> &IndexMap<String, usize> {
        &self.columns
    }

    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Column names ordered by position.
    pub fn names(&self) -> Vec<&str> {
        let mut named: Vec<(&str, usize)> = self.columns.iter().map(|(n, i)| (n.as_str(), *i)).collect();
        named.sort_by_key(|(_, i)| *i);
        named.into_iter().map(|(n, _)| n).collect()
    }

    /// Smallest row width that holds every named position.
    pub fn min_arity(&self) -> usize {
        self.columns.values().max().map(|m| m + 1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
