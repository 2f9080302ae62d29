pub mod api_keys;
pub mod collections;
pub mod content;
pub mod items;
pub mod session;
pub mod stats;
pub mod transfer;

use crate::error::ApiError;

/// Path segments carry ids as text; anything non-numeric becomes a 400
/// in the standard error envelope instead of a router-level rejection.
fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid {} id", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_numbers_only() {
        assert_eq!(parse_id("42", "item").unwrap(), 42);
        let err = parse_id("forty-two", "item").unwrap_err();
        assert_eq!(err.message(), "invalid item id");
    }
}
