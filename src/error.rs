// InvalidArgument

#[derive(Debug)]
pub struct InvalidArgument {
    message: String,
}

impl InvalidArgument {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid argument: {}", self.message)
    }
}

impl std::error::Error for InvalidArgument {}

// MissingIndex

#[derive(Debug)]
pub struct MissingIndex {
    pub position: usize,
}

impl MissingIndex {
    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl std::fmt::Display for MissingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No index resolved for bulk operation at position {}",
            self.position
        )
    }
}

impl std::error::Error for MissingIndex {}

// MissingId

#[derive(Debug)]
pub struct MissingId {
    pub position: usize,
}

impl MissingId {
    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl std::fmt::Display for MissingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No id resolved for bulk operation at position {}",
            self.position
        )
    }
}

impl std::error::Error for MissingId {}

// MissingDocument

#[derive(Debug)]
pub struct MissingDocument {
    pub position: usize,
}

impl MissingDocument {
    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl std::fmt::Display for MissingDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bulk operation at position {} requires a document",
            self.position
        )
    }
}

impl std::error::Error for MissingDocument {}

// SerializationFailed

#[derive(Debug)]
pub struct SerializationFailed {
    pub position: usize,
    source: serde_json::Error,
}

impl SerializationFailed {
    pub fn new(position: usize, source: serde_json::Error) -> Self {
        Self { position, source }
    }
}

impl std::fmt::Display for SerializationFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not serialize document for bulk operation at position {}",
            self.position
        )
    }
}

impl std::error::Error for SerializationFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
