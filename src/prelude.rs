pub use crate::{
    bulk::{Bulk, BulkPayload, Consistency, CreateOp, DeleteOp, IndexOp, UpdateOp, VersionType},
    document::Document,
};
