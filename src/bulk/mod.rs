//! Batch construction and serialization for the bulk write API.

pub mod op;
mod resolve;
mod serialize;

pub use self::op::{CreateOp, DeleteOp, IndexOp, UpdateOp, VersionType};

use std::sync::Mutex;

use crate::{document::Document, error::InvalidArgument};

use self::op::BulkOperation;

/// Minimum number of active shards required in the relevant partition for
/// each write to proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    One,
    Quorum,
    All,
}

impl Consistency {
    pub fn as_str(self) -> &'static str {
        match self {
            Consistency::One => "one",
            Consistency::Quorum => "quorum",
            Consistency::All => "all",
        }
    }
}

impl std::fmt::Display for Consistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized form of a batch: the newline-delimited body plus the query
/// parameters the transport should attach to the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkPayload {
    pub body: String,
    pub params: Vec<(&'static str, String)>,
}

/// An accumulating batch of heterogeneous write operations.
///
/// Operations are appended through the per-kind methods, each of which
/// hands a fresh descriptor to a configure closure. Appends go through an
/// internal mutex, so a `Bulk` shared across threads (e.g. in an `Arc`)
/// can be filled concurrently; wire order is the order in which appends
/// completed. Returning `None` from a configure closure skips the
/// operation and leaves the batch untouched, which allows conditional
/// construction inside the closure.
///
/// ```
/// use esbulk::prelude::*;
///
/// #[derive(serde::Serialize)]
/// struct Person {
///     #[serde(skip_serializing)]
///     id: u64,
///     name: String,
/// }
///
/// impl Document for Person {
///     fn default_index() -> Option<String> {
///         Some("people".into())
///     }
///
///     fn document_id(&self) -> Option<String> {
///         Some(self.id.to_string())
///     }
/// }
///
/// let bulk = Bulk::new().refresh(true);
/// bulk.index(|op| op.document(Person { id: 1, name: "A".into() }))
///     .delete(|op: DeleteOp<Person>| op.id(2));
/// let payload = bulk.build().unwrap();
/// assert_eq!(
///     payload.body,
///     "{\"index\":{\"_index\":\"people\",\"_id\":\"1\"}}\n\
///      {\"name\":\"A\"}\n\
///      {\"delete\":{\"_index\":\"people\",\"_id\":\"2\"}}\n"
/// );
/// ```
pub struct Bulk {
    pub(crate) fixed_index: Option<String>,
    pub(crate) fixed_type: Option<String>,
    consistency: Option<Consistency>,
    refresh: Option<bool>,
    operations: Mutex<Vec<BulkOperation>>,
}

impl std::fmt::Debug for Bulk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bulk")
            .field("fixed_index", &self.fixed_index)
            .field("fixed_type", &self.fixed_type)
            .field("consistency", &self.consistency)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl Default for Bulk {
    fn default() -> Self {
        Self::new()
    }
}

impl Bulk {
    pub fn new() -> Self {
        Self {
            fixed_index: None,
            fixed_type: None,
            consistency: None,
            refresh: None,
            operations: Mutex::new(Vec::new()),
        }
    }

    /// Require a minimum number of active shards for the writes. Sent as
    /// the `consistency` query parameter.
    pub fn consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    /// Refresh the affected shards immediately after the call, making the
    /// writes searchable without waiting for the refresh interval. Sent as
    /// the `refresh` query parameter.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Route every operation that does not name its own index (and type)
    /// to a fixed path, taking precedence over the per-type defaults.
    ///
    /// Fails if `index` is empty.
    pub fn fixed_path(
        mut self,
        index: impl Into<String>,
        ty: Option<String>,
    ) -> Result<Self, InvalidArgument> {
        let index = index.into();
        if index.is_empty() {
            return Err(InvalidArgument::new("fixed path index must not be empty"));
        }
        self.fixed_index = Some(index);
        self.fixed_type = ty;
        Ok(self)
    }

    /// Append a `create` operation. Fails the whole request if the
    /// document already exists.
    pub fn create<T, F, R>(&self, configure: F) -> &Self
    where
        T: Document + Send + Sync + 'static,
        F: FnOnce(CreateOp<T>) -> R,
        R: Into<Option<CreateOp<T>>>,
    {
        if let Some(op) = configure(CreateOp::new()).into() {
            self.push(op.into_operation());
        }
        self
    }

    /// Append an `index` operation, creating or replacing the document.
    pub fn index<T, F, R>(&self, configure: F) -> &Self
    where
        T: Document + Send + Sync + 'static,
        F: FnOnce(IndexOp<T>) -> R,
        R: Into<Option<IndexOp<T>>>,
    {
        if let Some(op) = configure(IndexOp::new()).into() {
            self.push(op.into_operation());
        }
        self
    }

    /// Append a `delete` operation.
    pub fn delete<T, F, R>(&self, configure: F) -> &Self
    where
        T: Document,
        F: FnOnce(DeleteOp<T>) -> R,
        R: Into<Option<DeleteOp<T>>>,
    {
        if let Some(op) = configure(DeleteOp::new()).into() {
            self.push(op.into_operation());
        }
        self
    }

    /// Append an `update` operation whose partial document has the same
    /// type as the full document.
    pub fn update<T, F, R>(&self, configure: F) -> &Self
    where
        T: Document + Send + Sync + 'static,
        F: FnOnce(UpdateOp<T, T>) -> R,
        R: Into<Option<UpdateOp<T, T>>>,
    {
        self.update_with::<T, T, F, R>(configure)
    }

    /// Append an `update` operation with a dedicated partial-document
    /// type `K`.
    pub fn update_with<T, K, F, R>(&self, configure: F) -> &Self
    where
        T: Document + Send + Sync + 'static,
        K: serde::Serialize + Send + Sync + 'static,
        F: FnOnce(UpdateOp<T, K>) -> R,
        R: Into<Option<UpdateOp<T, K>>>,
    {
        if let Some(op) = configure(UpdateOp::new()).into() {
            self.push(op.into_operation());
        }
        self
    }

    fn push(&self, op: BulkOperation) {
        tracing::trace!(kind = op.kind(), "appending bulk operation");
        self.operations.lock().unwrap().push(op);
    }

    /// Number of operations appended so far.
    pub fn len(&self) -> usize {
        self.operations.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the batch into its wire payload.
    ///
    /// A single forward pass over the operations in append order: each one
    /// has its metadata resolved and is emitted as an action line plus, for
    /// every kind but delete, a source line. The batch is not consumed or
    /// mutated, and repeated calls on an unmodified batch produce
    /// byte-identical payloads.
    ///
    /// Any resolution or serialization failure aborts the build; the error
    /// downcasts to the concrete type in [`crate::error`] and names the
    /// offending operation's position.
    pub fn build(&self) -> Result<BulkPayload, anyhow::Error> {
        let operations = self.operations.lock().unwrap();
        let body = serialize::write_payload(self, &operations)?;

        let mut params = Vec::new();
        if let Some(consistency) = self.consistency {
            params.push(("consistency", consistency.as_str().to_string()));
        }
        if let Some(refresh) = self.refresh {
            params.push(("refresh", refresh.to_string()));
        }

        tracing::debug!(
            operations = operations.len(),
            bytes = body.len(),
            "serialized bulk payload"
        );
        Ok(BulkPayload { body, params })
    }
}
