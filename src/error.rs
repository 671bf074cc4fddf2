/// Errors surfaced to callers of the strict parsing and configuration APIs.
///
/// DOM lookups that come up empty are not errors; they are silent no-ops
/// retried by the next observation cycle.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("unknown filter parameter: {0}")]
    UnknownParam(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
