use crate::error::SearchError;

/// Trims `raw` and rejects it if nothing is left.
pub fn validate_query(raw: &str) -> Result<&str, SearchError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(query)
}
