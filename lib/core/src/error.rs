//! Error handling foundation for the copper-almanac platform.
//!
//! Only the `Result` type alias lives here. Each crate keeps its own
//! domain error enum next to the code that raises it; backend clients
//! return those enums wrapped in a rootcause `Report` so callers can
//! attach context as a failure crosses layers.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_defaults_to_unit_context() {
        let resolved: Result<&str> = Ok("tomorrow");
        assert_eq!(resolved.expect("should resolve"), "tomorrow");
    }
}
