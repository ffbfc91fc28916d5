use crate::error::{MissingDocument, MissingId, MissingIndex};

use super::{
    op::{BulkOperation, OperationBody, VersionType},
    Bulk,
};

/// Effective target metadata for one operation, after applying the
/// fallback chain.
pub(crate) struct ResolvedMeta<'a> {
    pub index: &'a str,
    pub ty: Option<&'a str>,
    pub id: Option<&'a str>,
    pub routing: Option<&'a str>,
    pub parent: Option<&'a str>,
    pub version: Option<u64>,
    pub version_type: Option<VersionType>,
}

/// Resolve index, type and id for `op`, first-defined-wins per field:
/// explicit value on the operation, then the batch fixed path (index and
/// type only), then the defaults captured from the document type. Ids fall
/// back to the identity extracted from the document instance.
///
/// `position` is the operation's place in the batch and is carried by
/// every resolution error.
pub(crate) fn resolve<'a>(
    op: &'a BulkOperation,
    batch: &'a Bulk,
    position: usize,
) -> Result<ResolvedMeta<'a>, anyhow::Error> {
    let meta = &op.meta;

    let index = meta
        .index
        .as_deref()
        .or_else(|| batch.fixed_index.as_deref())
        .or_else(|| meta.default_index.as_deref())
        .ok_or_else(|| MissingIndex::new(position))?;

    let ty = meta
        .ty
        .as_deref()
        .or_else(|| batch.fixed_type.as_deref())
        .or_else(|| meta.default_type.as_deref());

    let id = meta.id.as_deref().or_else(|| meta.derived_id.as_deref());
    if id.is_none() && op.requires_id() {
        return Err(MissingId::new(position).into());
    }

    match &op.body {
        OperationBody::Create { source: None } | OperationBody::Index { source: None } => {
            return Err(MissingDocument::new(position).into());
        }
        OperationBody::Update {
            doc: None,
            script: None,
            ..
        } => {
            return Err(MissingDocument::new(position).into());
        }
        _ => {}
    }

    Ok(ResolvedMeta {
        index,
        ty,
        id,
        routing: meta.routing.as_deref(),
        parent: meta.parent.as_deref(),
        version: meta.version,
        version_type: meta.version_type,
    })
}
