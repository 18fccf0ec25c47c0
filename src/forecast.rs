//! Interest growth projections for the forecast view.

/// Value of an investment at the end of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub year: u32,
    pub simple: f64,
    pub compound: f64,
}

/// `P(1 + rt)` with `rate_pct` given as a percentage.
pub fn simple_interest(principal: f64, rate_pct: f64, years: f64) -> f64 {
    principal * (1.0 + rate_pct / 100.0 * years)
}

/// `P(1 + r)^t` with `rate_pct` given as a percentage.
pub fn compound_interest(principal: f64, rate_pct: f64, years: f64) -> f64 {
    principal * (1.0 + rate_pct / 100.0).powf(years)
}

/// Year-by-year series from year 0 through `years` inclusive.
pub fn interest_projection(principal: f64, rate_pct: f64, years: u32) -> Vec<ForecastPoint> {
    (0..=years)
        .map(|year| ForecastPoint {
            year,
            simple: simple_interest(principal, rate_pct, f64::from(year)),
            compound: compound_interest(principal, rate_pct, f64::from(year)),
        })
        .collect()
}
