use serde_json::Value;

use crate::error::SerializationFailed;

use super::{
    op::{BulkOperation, OperationBody, Source, VersionType},
    resolve, Bulk,
};

/// The action line preceding each operation's source. Externally tagged,
/// so it serializes as a single-key object naming the operation kind.
#[derive(serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum ActionLine<'a> {
    Create(Action<'a>),
    Index(Action<'a>),
    Delete(Action<'a>),
    Update(Action<'a>),
}

// Field order here is the wire order. Unset fields are omitted, never
// emitted as null.
#[derive(serde::Serialize)]
struct Action<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    ty: Option<&'a str>,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    routing: Option<&'a str>,
    #[serde(rename = "_parent", skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    version: Option<u64>,
    #[serde(rename = "_version_type", skip_serializing_if = "Option::is_none")]
    version_type: Option<VersionType>,
}

#[derive(serde::Serialize)]
struct UpdateSource<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc_as_upsert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    script: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'a serde_json::Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upsert: Option<Value>,
}

fn to_json(source: &Source, position: usize) -> Result<Value, SerializationFailed> {
    source
        .to_json()
        .map_err(|err| SerializationFailed::new(position, err))
}

/// Emit the newline-delimited payload for `ops` in order. Every line is
/// compact JSON followed by a line feed, the last one included; delete
/// operations contribute an action line only. Read-only over the batch,
/// so repeated calls yield byte-identical output.
pub(crate) fn write_payload(batch: &Bulk, ops: &[BulkOperation]) -> Result<String, anyhow::Error> {
    let mut out = String::new();

    for (position, op) in ops.iter().enumerate() {
        let meta = resolve::resolve(op, batch, position)?;
        let action = Action {
            index: meta.index,
            ty: meta.ty,
            id: meta.id,
            routing: meta.routing,
            parent: meta.parent,
            version: meta.version,
            version_type: meta.version_type,
        };
        let line = match &op.body {
            OperationBody::Create { .. } => ActionLine::Create(action),
            OperationBody::Index { .. } => ActionLine::Index(action),
            OperationBody::Delete => ActionLine::Delete(action),
            OperationBody::Update { .. } => ActionLine::Update(action),
        };
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');

        match &op.body {
            OperationBody::Create { source } | OperationBody::Index { source } => {
                // A missing document was already rejected during resolution.
                if let Some(source) = source {
                    let value = to_json(source, position)?;
                    out.push_str(&serde_json::to_string(&value)?);
                    out.push('\n');
                }
            }
            OperationBody::Delete => {}
            OperationBody::Update {
                doc,
                doc_as_upsert,
                script,
                script_params,
                upsert,
            } => {
                let doc = match doc {
                    Some(source) => Some(to_json(source, position)?),
                    None => None,
                };
                let upsert = match upsert {
                    Some(source) => Some(to_json(source, position)?),
                    None => None,
                };
                let source = UpdateSource {
                    doc,
                    doc_as_upsert: *doc_as_upsert,
                    script: script.as_deref(),
                    params: script_params.as_ref(),
                    upsert,
                };
                out.push_str(&serde_json::to_string(&source)?);
                out.push('\n');
            }
        }
    }

    Ok(out)
}
