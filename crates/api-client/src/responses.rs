use serde::Deserialize;

// FRED returns every value as a string, with "." standing in for a missing observation.

/// The response from a successful `GET /fred/series/observations` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsResponse {
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
    pub count: Option<u64>,
    pub observations: Vec<RawObservation>,
    // There are more fields (units, sort order, paging), but we don't use them.
}

/// A single observation row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub value: String,
}

/// Represents an error response from the FRED API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error_code: u16,
    pub error_message: String,
}
