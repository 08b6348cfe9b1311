use thiserror::Error;

pub type DesignerResult<T> = Result<T, DesignerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    #[error("Block '{id}' not found on this page")]
    BlockNotFound { id: String },

    #[error("Invalid block type '{value}'. Expected one of: {expected}")]
    InvalidBlockType { value: String, expected: String },

    #[error("Invalid content for '{block_type}' block: {reason}")]
    InvalidContent { block_type: String, reason: String },

    #[error("Unknown field '{field}' for '{block_type}' block")]
    UnknownField { block_type: String, field: String },

    #[error("Asset upload failed: {reason}")]
    AssetUploadFailure { reason: String },

    #[error("Template '{id}' not found")]
    TemplateNotFound { id: String },

    #[error("Page '{id}' not found")]
    PageNotFound { id: String },

    #[error("Slug '{slug}' is already used by another page")]
    SlugConflict { slug: String },

    #[error("Invalid slug '{slug}': use lowercase letters, digits and single dashes")]
    InvalidSlug { slug: String },

    #[error("Invalid color value '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Value out of range for '{property}': {value}. Expected range: {range}")]
    ValueOutOfRange {
        property: String,
        value: String,
        range: String,
    },

    #[error("Duplicate block id '{id}': block ids must be unique within the page")]
    DuplicateBlockId { id: String },

    #[error("Blocks of type '{block_type}' cannot be resized")]
    NotResizable { block_type: String },

    #[error("Handle '{handle}' is not available on '{block_type}' blocks")]
    InvalidHandle { handle: String, block_type: String },

    #[error("{kind} '{id}' not found in block '{block_id}'")]
    ItemNotFound {
        block_id: String,
        kind: String,
        id: String,
    },

    #[error("Cannot remove the last {kind} of block '{block_id}'")]
    LastItem { block_id: String, kind: String },

    #[error("Page '{slug}' is not published")]
    NotPublished { slug: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Editing is disabled in preview mode")]
    PreviewMode,

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("YAML error: {0}")]
    YamlError(String),
}

impl From<serde_json::Error> for DesignerError {
    fn from(err: serde_json::Error) -> Self {
        DesignerError::DeserializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DesignerError {
    fn from(err: serde_yaml::Error) -> Self {
        DesignerError::YamlError(err.to_string())
    }
}
