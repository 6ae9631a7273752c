/// Fast mover filtering
///
/// Two predicates decide whether a row is worth an alert:
/// - momentum: every tracked price change (5m, 1h, 6h, 24h) is strictly positive
/// - freshness: the pair was listed minutes ago, or at most `max_hours` hours ago
///
/// Both fail closed: anything that does not parse is rejected.
use crate::coin::{CoinRecord, PRICE_CHANGE_FIELDS};
use crate::logger::{self, LogTag};

/// Default upper bound for pairs whose age is shown in hours
pub const DEFAULT_MAX_PAIR_AGE_HOURS: f64 = 24.0;

/// Why a record did not pass
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// A price change is missing or not a number
    UnparsablePriceChange { field: &'static str, value: Option<String> },
    /// A price change is zero or negative
    NonPositivePriceChange { field: &'static str, value: f64 },
    /// Age is missing or not `<digits><unit>`
    MalformedPairAge(Option<String>),
    /// Age parsed but is too old or in an unaccepted unit
    PairTooOld(PairAge),
}

impl Rejection {
    /// Stable key for counting rejections
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::UnparsablePriceChange { .. } => "price_change_unparsable",
            Rejection::NonPositivePriceChange { .. } => "price_change_not_positive",
            Rejection::MalformedPairAge(_) => "pair_age_malformed",
            Rejection::PairTooOld(_) => "pair_too_old",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::UnparsablePriceChange { field, value } => {
                write!(f, "{} unparsable ({})", field, value.as_deref().unwrap_or("missing"))
            }
            Rejection::NonPositivePriceChange { field, value } => {
                write!(f, "{} not positive ({}%)", field, value)
            }
            Rejection::MalformedPairAge(value) => {
                write!(f, "pair age malformed ({})", value.as_deref().unwrap_or("missing"))
            }
            Rejection::PairTooOld(age) => write!(f, "pair too old ({})", age),
        }
    }
}

// =============================================================================
// PRICE MOMENTUM
// =============================================================================

/// Parse a displayed percentage such as `"1,234.5%"` or `"-0.1%"`
///
/// Strips `%` and thousands separators and surrounding whitespace.
pub fn parse_percent(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '%' && *c != ',')
        .collect();
    cleaned.trim().parse::<f64>().ok()
}

/// Check four price changes, returning the first reason to reject
pub fn check_price_changes(changes: [Option<&str>; 4]) -> Result<(), Rejection> {
    let mut parsed = [0.0_f64; 4];

    // Parse everything first: one unparsable field rejects the whole set
    for (index, (field, value)) in PRICE_CHANGE_FIELDS.iter().zip(changes.iter()).enumerate() {
        match value.and_then(parse_percent) {
            Some(number) => parsed[index] = number,
            None => {
                return Err(Rejection::UnparsablePriceChange {
                    field: *field,
                    value: value.map(str::to_string),
                })
            }
        }
    }

    for (field, value) in PRICE_CHANGE_FIELDS.iter().zip(parsed.iter()) {
        // NaN fails this comparison as well
        if !(*value > 0.0) {
            return Err(Rejection::NonPositivePriceChange {
                field: *field,
                value: *value,
            });
        }
    }

    Ok(())
}

/// True iff all four price changes parse and are strictly positive
pub fn has_positive_momentum(changes: [Option<&str>; 4]) -> bool {
    check_price_changes(changes).is_ok()
}

// =============================================================================
// PAIR AGE
// =============================================================================

/// Pair age as displayed by the dashboard: a whole number and a unit letter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairAge {
    Minutes(u64),
    Hours(u64),
    Days(u64),
    /// Any other trailing unit letter, such as `y`
    Other(u64, char),
}

impl std::fmt::Display for PairAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairAge::Minutes(n) => write!(f, "{}m", n),
            PairAge::Hours(n) => write!(f, "{}h", n),
            PairAge::Days(n) => write!(f, "{}d", n),
            PairAge::Other(n, unit) => write!(f, "{}{}", n, unit),
        }
    }
}

/// Parse `<digits><unit>`; the unit is the single trailing character
///
/// Returns `None` for empty input, a missing or non-digit prefix.
pub fn parse_pair_age(value: &str) -> Option<PairAge> {
    let value = value.trim();
    let unit = value.chars().last()?;
    let number = &value[..value.len() - unit.len_utf8()];

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let amount: u64 = number.parse().ok()?;
    Some(match unit {
        'm' => PairAge::Minutes(amount),
        'h' => PairAge::Hours(amount),
        'd' => PairAge::Days(amount),
        other => PairAge::Other(amount, other),
    })
}

/// Check pair age against the freshness rule
pub fn check_pair_age(value: Option<&str>, max_hours: f64) -> Result<PairAge, Rejection> {
    let age = value
        .and_then(parse_pair_age)
        .ok_or_else(|| Rejection::MalformedPairAge(value.map(str::to_string)))?;

    match age {
        PairAge::Minutes(_) => Ok(age),
        PairAge::Hours(hours) if (hours as f64) <= max_hours => Ok(age),
        _ => Err(Rejection::PairTooOld(age)),
    }
}

/// True iff the age is in minutes, or in hours and at most `max_hours`
pub fn is_fresh_pair(value: &str, max_hours: f64) -> bool {
    check_pair_age(Some(value), max_hours).is_ok()
}

// =============================================================================
// COMBINED
// =============================================================================

/// Apply both predicates to a record, momentum first
pub fn evaluate(record: &CoinRecord, max_pair_age_hours: f64) -> Result<(), Rejection> {
    let symbol = record.display_symbol();

    logger::debug(
        LogTag::Filtering,
        &format!("Checking price changes for {}: {:?}", symbol, record.price_changes()),
    );
    check_price_changes(record.price_changes())?;

    logger::debug(
        LogTag::Filtering,
        &format!("Checking pair age for {}: {:?}", symbol, record.pair_age),
    );
    check_pair_age(record.pair_age.as_deref(), max_pair_age_hours)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("1.2%"), Some(1.2));
        assert_eq!(parse_percent("-0.1%"), Some(-0.1));
        assert_eq!(parse_percent("1,234%"), Some(1234.0));
        assert_eq!(parse_percent(" 12.5 % "), Some(12.5));
        assert_eq!(parse_percent("-"), None);
        assert_eq!(parse_percent(""), None);
        assert_eq!(parse_percent("abc%"), None);
    }

    #[test]
    fn test_all_positive_passes() {
        assert!(has_positive_momentum([
            Some("1.2%"),
            Some("0.5%"),
            Some("3%"),
            Some("10%"),
        ]));
    }

    #[test]
    fn test_any_negative_fails() {
        for index in 0..4 {
            let mut changes = [Some("1.2%"), Some("0.5%"), Some("3%"), Some("10%")];
            changes[index] = Some("-0.1%");
            assert!(!has_positive_momentum(changes), "position {}", index);
        }
    }

    #[test]
    fn test_zero_is_not_positive() {
        let result = check_price_changes([Some("0%"), Some("1%"), Some("1%"), Some("1%")]);
        assert_eq!(
            result,
            Err(Rejection::NonPositivePriceChange {
                field: "price-change-m5",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_non_numeric_fails_closed() {
        assert!(!has_positive_momentum([Some("1%"), Some("n/a"), Some("3%"), Some("4%")]));
        assert!(!has_positive_momentum([Some("1%"), Some("2%"), None, Some("4%")]));
    }

    #[test]
    fn test_unparsable_beats_negative() {
        // A negative earlier field does not hide a parse failure later on
        let result = check_price_changes([Some("-1%"), Some("2%"), Some("3%"), Some("?")]);
        assert!(matches!(
            result,
            Err(Rejection::UnparsablePriceChange { field: "price-change-h24", .. })
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(!has_positive_momentum([Some("NaN%"), Some("1%"), Some("1%"), Some("1%")]));
    }

    #[test]
    fn test_pair_age_rules() {
        assert!(is_fresh_pair("5m", DEFAULT_MAX_PAIR_AGE_HOURS));
        assert!(is_fresh_pair("59m", DEFAULT_MAX_PAIR_AGE_HOURS));
        assert!(is_fresh_pair("24h", DEFAULT_MAX_PAIR_AGE_HOURS));
        assert!(!is_fresh_pair("25h", DEFAULT_MAX_PAIR_AGE_HOURS));
        assert!(!is_fresh_pair("3d", DEFAULT_MAX_PAIR_AGE_HOURS));
        assert!(!is_fresh_pair("", DEFAULT_MAX_PAIR_AGE_HOURS));
    }

    #[test]
    fn test_pair_age_malformed() {
        assert_eq!(parse_pair_age("m"), None);
        assert_eq!(parse_pair_age("1.5h"), None);
        assert_eq!(parse_pair_age("-5m"), None);
        assert_eq!(parse_pair_age("h5"), None);
        assert_eq!(parse_pair_age("1mo"), None);
    }

    #[test]
    fn test_parse_pair_age_units() {
        assert_eq!(parse_pair_age("10m"), Some(PairAge::Minutes(10)));
        assert_eq!(parse_pair_age("7h"), Some(PairAge::Hours(7)));
        assert_eq!(parse_pair_age("3d"), Some(PairAge::Days(3)));
        assert_eq!(parse_pair_age("2y"), Some(PairAge::Other(2, 'y')));
    }

    #[test]
    fn test_max_hours_is_configurable() {
        assert!(is_fresh_pair("6h", 6.0));
        assert!(!is_fresh_pair("7h", 6.0));
        assert!(is_fresh_pair("900m", 6.0));
    }

    #[test]
    fn test_evaluate_record() {
        let mut record = CoinRecord {
            token_symbol: Some("BONK".to_string()),
            price_change_m5: Some("2%".to_string()),
            price_change_h1: Some("4%".to_string()),
            price_change_h6: Some("8%".to_string()),
            price_change_h24: Some("16%".to_string()),
            pair_age: Some("10m".to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate(&record, DEFAULT_MAX_PAIR_AGE_HOURS), Ok(()));

        record.pair_age = Some("2d".to_string());
        assert_eq!(
            evaluate(&record, DEFAULT_MAX_PAIR_AGE_HOURS),
            Err(Rejection::PairTooOld(PairAge::Days(2)))
        );

        record.pair_age = None;
        assert_eq!(
            evaluate(&record, DEFAULT_MAX_PAIR_AGE_HOURS),
            Err(Rejection::MalformedPairAge(None))
        );
    }
}
