//! Query Executor interface.
//!
//! The storage or search backend that turns a [`QuerySpec`] into ordered ids. The
//! engine treats any failure as "nothing matched"; executors should not retry.

pub mod memory;

use crate::error::ExecutorError;
use crate::query::QuerySpec;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};

pub use memory::{InMemoryExecutor, StoredItem, StoredTerm};

/// One page of ids plus the number of items matching before pagination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub ids: Vec<ItemId>,
    /// Matches before offset and pagination are applied
    pub total_matched: u64,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Backend able to evaluate a compiled query.
///
/// Implementations must support item-type scoping, term filters (single and multi
/// term, any/all/none), numeric and equality meta filters, id inclusion and
/// exclusion, offset, sorting by field or by typed meta value, and pagination.
pub trait QueryExecutor {
    fn execute(&self, spec: &QuerySpec) -> Result<QueryResult, ExecutorError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, spec: &QuerySpec) -> Result<QueryResult, ExecutorError> {
        (**self).execute(spec)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Box<T> {
    fn execute(&self, spec: &QuerySpec) -> Result<QueryResult, ExecutorError> {
        (**self).execute(spec)
    }
}
