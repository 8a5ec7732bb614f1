//! # NumberFormat
//!
//! pt-BR text ↔ number conversion for the calculator forms.
//!
//! Solvers never import this module: the portal parses masked text here,
//! hands plain numbers to a solver, and formats the result back.
//!
//! ## Accepted Input
//! ```text
//! "1.234,56"     → 1234.56   (comma present: '.' groups, ',' is decimal)
//! "R$ 1.234,56"  → 1234.56   (currency symbol stripped)
//! "18%"          → 18.0      (percent sign stripped)
//! "1.234.567"    → 1234567.0 (only groups of three: grouping)
//! "18.5"         → 18.5      (any other single '.': decimal point)
//! ""             → None      (empty field)
//! ```

use crate::error::ValidationError;
use crate::money::{group_thousands, Money};
use crate::validation::ValidationResult;

/// Parses a pt-BR formatted number. Empty input yields `Ok(None)`.
///
/// ## Example
/// ```rust
/// use margem_core::format::parse_decimal;
///
/// assert_eq!(parse_decimal("preco", "1.494,33").unwrap(), Some(1494.33));
/// assert_eq!(parse_decimal("preco", "  ").unwrap(), None);
/// assert!(parse_decimal("preco", "12,3,4").is_err());
/// ```
pub fn parse_decimal(field: &str, raw: &str) -> ValidationResult<Option<f64>> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    if body.is_empty() {
        return Err(invalid("missing digits"));
    }
    if let Some(bad) = body.chars().find(|c| !c.is_ascii_digit() && *c != '.' && *c != ',') {
        return Err(invalid(&format!("unexpected character '{}'", bad)));
    }
    if body.matches(',').count() > 1 {
        return Err(invalid("more than one decimal comma"));
    }

    let canonical = if let Some((int_part, frac_part)) = body.split_once(',') {
        if frac_part.contains('.') {
            return Err(invalid("grouping separator after decimal comma"));
        }
        if int_part.contains('.') && !is_grouped(int_part) {
            return Err(invalid("misplaced grouping separator"));
        }
        format!("{}.{}", int_part.replace('.', ""), frac_part)
    } else if is_grouped(body) {
        body.replace('.', "")
    } else if body.matches('.').count() > 1 {
        return Err(invalid("misplaced grouping separator"));
    } else {
        body.to_string()
    };

    let canonical = if canonical.starts_with('.') {
        format!("0{}", canonical)
    } else {
        canonical
    };

    let value: f64 = canonical
        .trim_end_matches('.')
        .parse()
        .map_err(|_| invalid("not a number"))?;

    Ok(Some(if negative { -value } else { value }))
}

/// True for `d{1,3}(.ddd)+`, e.g. `1.234` or `12.345.678`.
fn is_grouped(text: &str) -> bool {
    let mut groups = text.split('.');
    let Some(head) = groups.next() else {
        return false;
    };
    let head_ok = (1..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_digit());

    let mut tail_count = 0;
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        tail_count += 1;
    }

    head_ok && tail_count > 0
}

/// Formats with `.` grouping and `,` decimals: `1234.5` → `"1.234,50"`.
///
/// Non-finite values format as an empty string so a form field clears
/// instead of showing `NaN`.
pub fn format_decimal(value: f64, decimals: u8) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let scale = 10_f64.powi(i32::from(decimals));
    let scaled = (value.abs() * scale).round();
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return String::new();
    }

    let scaled = scaled as u64;
    let divisor = 10_u64.pow(u32::from(decimals));
    let whole = scaled / divisor;
    let frac = scaled % divisor;
    let sign = if value < 0.0 && scaled != 0 { "-" } else { "" };

    if decimals == 0 {
        format!("{}{}", sign, group_thousands(whole))
    } else {
        format!(
            "{}{},{:0width$}",
            sign,
            group_thousands(whole),
            frac,
            width = usize::from(decimals)
        )
    }
}

/// Formats a percent-unit value: `28.6667` → `"28,67%"`.
pub fn format_percent(value: f64, decimals: u8) -> String {
    let body = format_decimal(value, decimals);
    if body.is_empty() {
        return body;
    }
    format!("{}%", body)
}

/// Formats an amount as currency, rounded to the centavo:
/// `(1234.56, "R$")` → `"R$ 1.234,56"`.
///
/// Non-finite or out-of-range amounts format as an empty string.
pub fn format_currency(value: f64, symbol: &str) -> String {
    Money::from_amount(value)
        .map(|m| m.to_display(symbol))
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<f64> {
        parse_decimal("campo", raw).unwrap()
    }

    #[test]
    fn test_parse_pt_br() {
        assert_eq!(parse("1.234,56"), Some(1234.56));
        assert_eq!(parse("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse("0,5"), Some(0.5));
        assert_eq!(parse(",5"), Some(0.5));
        assert_eq!(parse("300"), Some(300.0));
        assert_eq!(parse("-86,00"), Some(-86.0));
    }

    #[test]
    fn test_parse_percent_and_whitespace() {
        assert_eq!(parse("18%"), Some(18.0));
        assert_eq!(parse(" 28,67 % "), Some(28.67));
        assert_eq!(parse("R$\u{a0}10,00"), Some(10.0));
    }

    #[test]
    fn test_parse_dot_disambiguation() {
        assert_eq!(parse("1.234"), Some(1234.0));
        assert_eq!(parse("12.345.678"), Some(12_345_678.0));
        assert_eq!(parse("18.5"), Some(18.5));
        assert_eq!(parse("1234.56"), Some(1234.56));
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("R$"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_decimal("custo", "abc").is_err());
        assert!(parse_decimal("custo", "1,2,3").is_err());
        assert!(parse_decimal("custo", "1,234.5").is_err());
        assert!(parse_decimal("custo", "12.34.5").is_err());
        assert!(parse_decimal("custo", "-").is_err());

        let err = parse_decimal("custo", "12x").unwrap_err();
        assert_eq!(err.field(), Some("custo"));
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.5, 2), "1.234,50");
        assert_eq!(format_decimal(13333.333_3, 2), "13.333,33");
        assert_eq!(format_decimal(-86.0, 2), "-86,00");
        assert_eq!(format_decimal(-0.001, 2), "0,00");
        assert_eq!(format_decimal(266.666, 0), "267");
        assert_eq!(format_decimal(f64::NAN, 2), "");
    }

    #[test]
    fn test_format_percent_and_currency() {
        assert_eq!(format_percent(28.666_67, 2), "28,67%");
        assert_eq!(format_currency(1494.33, "R$"), "R$ 1.494,33");
        assert_eq!(format_currency(288.664, "R$"), "R$ 288,66");
        assert_eq!(format_currency(-0.005, "€"), "-€ 0,01");
        assert_eq!(format_currency(f64::INFINITY, "R$"), "");
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        let shown = format_decimal(1603.671_2, 2);
        assert_eq!(parse(&shown), Some(1603.67));
    }
}
