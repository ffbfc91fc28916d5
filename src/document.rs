/// Implemented by types that can be written through the bulk API.
///
/// The three hooks are fallback sources consulted during metadata
/// resolution, after any value set explicitly on the operation and after
/// the batch-wide fixed path. They all default to `None`, in which case
/// an operation that cannot resolve an index (or an id, for kinds that
/// require one) fails at build time.
pub trait Document: serde::Serialize {
    /// Index written to when neither the operation nor the batch names one.
    ///
    /// Typically derived from the type name by the application's naming
    /// convention, e.g. `Person -> "people"`.
    fn default_index() -> Option<String> {
        None
    }

    /// Mapping type written to when neither the operation nor the batch
    /// names one.
    fn default_type() -> Option<String> {
        None
    }

    /// Identity of this instance, used as `_id` when the operation does
    /// not set one.
    fn document_id(&self) -> Option<String> {
        None
    }
}
