pub mod bulk;
pub mod document;
pub mod error;

pub mod prelude;
