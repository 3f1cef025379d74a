use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenterError {
    #[error("Nothing to draw for chart '{0}'")]
    EmptyChart(String),

    #[error("Failed to serialize the chart: {0}")]
    Serialization(#[from] serde_json::Error),
}
