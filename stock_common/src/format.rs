//! Display formatting for prices and fundamentals.
//!
//! Every helper takes an `Option` and renders `None` (or a non-finite value)
//! as [`NOT_AVAILABLE`].

/// Placeholder for values the provider did not report.
pub const NOT_AVAILABLE: &str = "N/A";

const TRILLION: f64 = 1_000_000_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `$150.25`
pub fn price(value: Option<f64>) -> String {
    known(value).map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${:.2}", v))
}

/// Money with a `T`/`B`/`M` suffix: `$2.80T`, `$512.00B`, `$3.10M`, `$950.00`.
pub fn large_money(value: Option<f64>) -> String {
    let Some(v) = known(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let magnitude = v.abs();
    if magnitude >= TRILLION {
        format!("${:.2}T", v / TRILLION)
    } else if magnitude >= BILLION {
        format!("${:.2}B", v / BILLION)
    } else if magnitude >= MILLION {
        format!("${:.2}M", v / MILLION)
    } else {
        format!("${:.2}", v)
    }
}

/// Plain two-decimal ratio: `28.50`.
pub fn ratio(value: Option<f64>) -> String {
    known(value).map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}", v))
}

/// Value already in percent: `0.42%`.
pub fn percent(value: Option<f64>) -> String {
    known(value).map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:.2}%", v))
}

/// Signed change with percent: `+2.00 (+1.35%)`.
pub fn signed_change(change: f64, change_percent: Option<f64>) -> String {
    match known(change_percent) {
        Some(pct) => format!("{:+.2} ({:+.2}%)", change, pct),
        None => format!("{:+.2}", change),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_money_picks_suffix() {
        assert_eq!(large_money(Some(2.8e12)), "$2.80T");
        assert_eq!(large_money(Some(5.12e11)), "$512.00B");
        assert_eq!(large_money(Some(3.1e6)), "$3.10M");
        assert_eq!(large_money(Some(950.0)), "$950.00");
        assert_eq!(large_money(None), "N/A");
    }

    #[test]
    fn non_finite_values_are_not_available() {
        assert_eq!(price(Some(f64::NAN)), "N/A");
        assert_eq!(ratio(Some(f64::INFINITY)), "N/A");
    }

    #[test]
    fn price_and_change_formatting() {
        assert_eq!(price(Some(150.0)), "$150.00");
        assert_eq!(percent(Some(0.42)), "0.42%");
        assert_eq!(signed_change(2.0, Some(1.3513)), "+2.00 (+1.35%)");
        assert_eq!(signed_change(-0.5, None), "-0.50");
    }
}
