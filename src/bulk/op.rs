use crate::document::Document;

/// Version check applied by the engine when executing a write.
#[derive(serde::Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Internal,
    External,
    ExternalGte,
    Force,
}

/// A document held behind its `serde::Serialize` impl so operations over
/// different document types can share one collection. Serialization is
/// deferred to build time, which keeps failures positioned and build
/// idempotent.
pub(crate) trait ErasedDocument: Send + Sync {
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
}

impl<T> ErasedDocument for T
where
    T: serde::Serialize + Send + Sync,
{
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub(crate) type Source = Box<dyn ErasedDocument>;

/// Target metadata for one operation.
///
/// The `explicit` fields were set on the operation descriptor by the
/// caller. The `default_*`/`derived_id` fields are the type-level and
/// instance-level fallbacks captured when the operation was appended;
/// precedence between them and the batch fixed path is applied in
/// `resolve`.
#[derive(Default)]
pub(crate) struct OperationMeta {
    pub index: Option<String>,
    pub ty: Option<String>,
    pub id: Option<String>,
    pub routing: Option<String>,
    pub parent: Option<String>,
    pub version: Option<u64>,
    pub version_type: Option<VersionType>,

    pub default_index: Option<String>,
    pub default_type: Option<String>,
    pub derived_id: Option<String>,
}

pub(crate) enum OperationBody {
    Create {
        source: Option<Source>,
    },
    Index {
        source: Option<Source>,
    },
    Delete,
    Update {
        doc: Option<Source>,
        doc_as_upsert: Option<bool>,
        script: Option<String>,
        script_params: Option<serde_json::Map<String, serde_json::Value>>,
        upsert: Option<Source>,
    },
}

/// One fully configured, type-erased entry in a bulk batch.
pub(crate) struct BulkOperation {
    pub meta: OperationMeta,
    pub body: OperationBody,
}

impl BulkOperation {
    pub(crate) fn kind(&self) -> &'static str {
        match self.body {
            OperationBody::Create { .. } => "create",
            OperationBody::Index { .. } => "index",
            OperationBody::Delete => "delete",
            OperationBody::Update { .. } => "update",
        }
    }

    /// Delete and update address an existing document, so they cannot be
    /// executed without an id.
    pub(crate) fn requires_id(&self) -> bool {
        matches!(
            self.body,
            OperationBody::Delete | OperationBody::Update { .. }
        )
    }
}

/// Fluent setters shared by every operation kind.
macro_rules! meta_setters {
    () => {
        /// Target index, overriding the batch fixed path and the type default.
        pub fn index(mut self, index: impl Into<String>) -> Self {
            self.meta.index = Some(index.into());
            self
        }

        /// Target mapping type, overriding the batch fixed path and the type
        /// default.
        pub fn ty(mut self, ty: impl Into<String>) -> Self {
            self.meta.ty = Some(ty.into());
            self
        }

        /// Document id, overriding any id derived from the document instance.
        pub fn id(mut self, id: impl ToString) -> Self {
            self.meta.id = Some(id.to_string());
            self
        }

        pub fn routing(mut self, routing: impl Into<String>) -> Self {
            self.meta.routing = Some(routing.into());
            self
        }

        pub fn parent(mut self, parent: impl ToString) -> Self {
            self.meta.parent = Some(parent.to_string());
            self
        }

        pub fn version(mut self, version: u64) -> Self {
            self.meta.version = Some(version);
            self
        }

        pub fn version_type(mut self, version_type: VersionType) -> Self {
            self.meta.version_type = Some(version_type);
            self
        }
    };
}

// CreateOp

/// A single `create` operation under construction.
pub struct CreateOp<T> {
    document: Option<T>,
    meta: OperationMeta,
}

impl<T> CreateOp<T>
where
    T: Document + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            document: None,
            meta: OperationMeta::default(),
        }
    }

    /// The document to create. Required.
    pub fn document(mut self, document: T) -> Self {
        self.document = Some(document);
        self
    }

    meta_setters!();

    pub(crate) fn into_operation(mut self) -> BulkOperation {
        self.meta.default_index = T::default_index();
        self.meta.default_type = T::default_type();
        if let Some(document) = &self.document {
            self.meta.derived_id = document.document_id();
        }
        BulkOperation {
            meta: self.meta,
            body: OperationBody::Create {
                source: self.document.map(|d| Box::new(d) as Source),
            },
        }
    }
}

// IndexOp

/// A single `index` operation under construction.
pub struct IndexOp<T> {
    document: Option<T>,
    meta: OperationMeta,
}

impl<T> IndexOp<T>
where
    T: Document + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            document: None,
            meta: OperationMeta::default(),
        }
    }

    /// The document to index. Required.
    pub fn document(mut self, document: T) -> Self {
        self.document = Some(document);
        self
    }

    meta_setters!();

    pub(crate) fn into_operation(mut self) -> BulkOperation {
        self.meta.default_index = T::default_index();
        self.meta.default_type = T::default_type();
        if let Some(document) = &self.document {
            self.meta.derived_id = document.document_id();
        }
        BulkOperation {
            meta: self.meta,
            body: OperationBody::Index {
                source: self.document.map(|d| Box::new(d) as Source),
            },
        }
    }
}

// DeleteOp

/// A single `delete` operation under construction.
///
/// Deletes carry no source body on the wire; the type parameter only
/// supplies the index/type defaults and, through [`DeleteOp::object`],
/// the instance identity.
pub struct DeleteOp<T> {
    meta: OperationMeta,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> DeleteOp<T>
where
    T: Document,
{
    pub(crate) fn new() -> Self {
        Self {
            meta: OperationMeta::default(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Derive the id from a document instance without sending its body.
    pub fn object(mut self, document: &T) -> Self {
        self.meta.derived_id = document.document_id();
        self
    }

    meta_setters!();

    pub(crate) fn into_operation(mut self) -> BulkOperation {
        self.meta.default_index = T::default_index();
        self.meta.default_type = T::default_type();
        BulkOperation {
            meta: self.meta,
            body: OperationBody::Delete,
        }
    }
}

// UpdateOp

/// A single `update` operation under construction.
///
/// `T` is the full document type, `K` the partial-document payload sent
/// as `doc` (defaults to `T`). Either a partial document or a script must
/// be set.
pub struct UpdateOp<T, K = T> {
    doc: Option<K>,
    doc_as_upsert: Option<bool>,
    script: Option<String>,
    script_params: Option<serde_json::Map<String, serde_json::Value>>,
    upsert: Option<T>,
    meta: OperationMeta,
}

impl<T, K> UpdateOp<T, K>
where
    T: Document + Send + Sync + 'static,
    K: serde::Serialize + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            doc: None,
            doc_as_upsert: None,
            script: None,
            script_params: None,
            upsert: None,
            meta: OperationMeta::default(),
        }
    }

    /// Partial document merged into the existing one.
    pub fn doc(mut self, doc: K) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Treat the partial document as the full document if the target does
    /// not exist yet.
    pub fn doc_as_upsert(mut self, doc_as_upsert: bool) -> Self {
        self.doc_as_upsert = Some(doc_as_upsert);
        self
    }

    /// Script executed against the existing document, instead of a partial
    /// document.
    pub fn script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Parameters made available to the script.
    pub fn script_params(
        mut self,
        params: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.script_params = Some(params);
        self
    }

    /// Full document indexed when the target does not exist yet.
    pub fn upsert(mut self, upsert: T) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// Derive the id from a document instance without sending its body.
    pub fn object(mut self, document: &T) -> Self {
        self.meta.derived_id = document.document_id();
        self
    }

    meta_setters!();

    pub(crate) fn into_operation(mut self) -> BulkOperation {
        self.meta.default_index = T::default_index();
        self.meta.default_type = T::default_type();
        if self.meta.derived_id.is_none() {
            if let Some(upsert) = &self.upsert {
                self.meta.derived_id = upsert.document_id();
            }
        }
        BulkOperation {
            meta: self.meta,
            body: OperationBody::Update {
                doc: self.doc.map(|d| Box::new(d) as Source),
                doc_as_upsert: self.doc_as_upsert,
                script: self.script,
                script_params: self.script_params,
                upsert: self.upsert.map(|d| Box::new(d) as Source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Widget {
        #[serde(skip_serializing)]
        serial: u64,
        label: String,
    }

    impl Document for Widget {
        fn default_index() -> Option<String> {
            Some("widgets".into())
        }

        fn default_type() -> Option<String> {
            Some("widget".into())
        }

        fn document_id(&self) -> Option<String> {
            Some(self.serial.to_string())
        }
    }

    #[test]
    fn test_index_op_captures_type_defaults_and_identity() {
        let op = IndexOp::new()
            .document(Widget {
                serial: 7,
                label: "a".into(),
            })
            .into_operation();

        assert_eq!(op.kind(), "index");
        assert!(!op.requires_id());
        assert_eq!(op.meta.default_index.as_deref(), Some("widgets"));
        assert_eq!(op.meta.default_type.as_deref(), Some("widget"));
        assert_eq!(op.meta.derived_id.as_deref(), Some("7"));
        assert_eq!(op.meta.index, None);
        assert_eq!(op.meta.id, None);
    }

    #[test]
    fn test_explicit_setters_kept_separate_from_derived() {
        let op = DeleteOp::<Widget>::new()
            .index("archive")
            .id(99)
            .into_operation();

        assert!(op.requires_id());
        assert_eq!(op.meta.index.as_deref(), Some("archive"));
        assert_eq!(op.meta.id.as_deref(), Some("99"));
        // Type defaults are still captured alongside the overrides.
        assert_eq!(op.meta.default_index.as_deref(), Some("widgets"));
    }

    #[test]
    fn test_update_op_derives_id_from_upsert() {
        let op = UpdateOp::<Widget>::new()
            .doc(Widget {
                serial: 3,
                label: "b".into(),
            })
            .upsert(Widget {
                serial: 3,
                label: "b".into(),
            })
            .into_operation();

        assert_eq!(op.meta.derived_id.as_deref(), Some("3"));
    }
}
