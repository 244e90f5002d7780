use std::{collections::HashMap, fmt, sync::Arc};

use once_cell::sync::Lazy;

use crate::{
    aggregators::{AggregateImpl, AvgImpl, CountImpl, MaxImpl, MinImpl, SumImpl},
    Config, QueryError, QueryResult,
};

static DEFAULT_REGISTRY: Lazy<Arc<AggregateRegistry>> =
    Lazy::new(|| Arc::new(AggregateRegistry::default_aggregate_registry()));

/// Registry of aggregates keyed by lowercase name.
#[derive(Default)]
pub struct AggregateRegistry {
    by_name: HashMap<String, Arc<dyn AggregateImpl>>,
}

impl AggregateRegistry {
    pub fn new() -> Self { Self { by_name: HashMap::new() } }

    pub fn register<I: AggregateImpl + 'static>(&mut self, impl_: I) {
        self.by_name.insert(impl_.name().to_ascii_lowercase(), Arc::new(impl_));
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AggregateImpl>> {
        self.by_name.get(name).cloned()
    }

    /// Lookup honouring `config.case_insensitive_functions`.
    pub fn resolve(&self, name: &str, config: &Config) -> QueryResult<Arc<dyn AggregateImpl>> {
        let found = if config.case_insensitive_functions {
            self.get(&name.to_ascii_lowercase())
        } else {
            self.get(name)
        };
        found.ok_or_else(|| QueryError::UnknownFunction(name.to_string()))
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn default_aggregate_registry() -> Self {
        let mut registry = Self::new();
        registry.register(CountImpl);
        registry.register(SumImpl);
        registry.register(AvgImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        registry
    }

    /// Process-wide instance of the default registry.
    pub fn shared_default() -> Arc<AggregateRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }
}

impl fmt::Debug for AggregateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateRegistry").field("functions", &self.list()).finish()
    }
}
