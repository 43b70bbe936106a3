//! Utility functions for the rating engine

/// Number of decimal places ratings are stored with
pub const RATING_PRECISION: i32 = 2;

/// Round a rating to [`RATING_PRECISION`] decimal places
pub fn round_rating(value: f64) -> f64 {
    let scale = 10f64.powi(RATING_PRECISION);
    (value * scale).round() / scale
}

/// Round a ratio to three decimal places (win percentages)
pub fn round_ratio(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
