//! Pure input validators.
//!
//! Contract: given a raw string input, return a boolean. Validators never
//! fail; callers translate a `false` into a field-keyed error message.

use regex::Regex;
use std::sync::LazyLock;

/// Case-insensitive `local@domain` where the domain contains a dot.
const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9+_.-]+@[A-Z0-9-]+(\.[A-Z0-9-]+)+$";

/// Strict `HH:MM`, 24-hour.
const TIME_PATTERN: &str = r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$";

#[allow(clippy::expect_used)] // Pattern is a constant; failure to compile is a bug
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

#[allow(clippy::expect_used)] // Pattern is a constant; failure to compile is a bug
static TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TIME_PATTERN).expect("time pattern compiles"));

/// Whether the input has at least `min` characters.
///
/// Counts characters, not bytes; the charset is otherwise unconstrained.
///
/// # Examples
///
/// ```
/// use vowsuite_planner::validate::has_min_chars;
///
/// assert!(has_min_chars("Jo", 2));
/// assert!(!has_min_chars("J", 2));
/// ```
#[must_use]
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// Whether the input is empty after trimming whitespace.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Whether the input contains at least 6 digit characters.
///
/// Separators and prefixes (`+`, spaces, dashes) are ignored; only the
/// digit count matters.
///
/// # Examples
///
/// ```
/// use vowsuite_planner::validate::is_valid_phone;
///
/// assert!(is_valid_phone("+48 123-456"));
/// assert!(!is_valid_phone("12 345"));
/// ```
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    value.chars().filter(char::is_ascii_digit).count() >= 6
}

/// Whether the input has `local@domain` shape with a dotted domain.
///
/// # Examples
///
/// ```
/// use vowsuite_planner::validate::is_valid_email;
///
/// assert!(is_valid_email("ann@x.com"));
/// assert!(!is_valid_email("ann@x"));
/// assert!(!is_valid_email("ann.x.com"));
/// ```
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Whether the input is a valid `HH:MM` 24-hour time.
///
/// # Examples
///
/// ```
/// use vowsuite_planner::validate::is_valid_time;
///
/// assert!(is_valid_time("16:30"));
/// assert!(!is_valid_time("24:00"));
/// assert!(!is_valid_time("7:30"));
/// ```
#[must_use]
pub fn is_valid_time(value: &str) -> bool {
    TIME.is_match(value)
}
