/// A document parse failure, annotated with the path to the offending
/// element.
#[derive(Debug, thiserror::Error)]
pub enum SerdeError {
    #[error(transparent)]
    Json(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error(transparent)]
    Yaml(#[from] serde_path_to_error::Error<serde_yaml::Error>),
}
