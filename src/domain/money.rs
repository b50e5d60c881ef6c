use std::fmt;

/// Money is represented as whole yen. The yen has no fractional unit, so an
/// i64 carries exact amounts with no sub-unit rounding concerns.
pub type Yen = i64;

/// Format yen as a human-readable currency string with digit grouping.
/// Example: 1200 -> "¥1,200", -150 -> "-¥150"
pub fn format_yen(amount: Yen) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.abs().to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}¥{}", sign, grouped)
}

/// Parse a yen amount from user input.
/// Accepts at most one leading "-", an optional "¥", and comma separators:
/// "¥1,200" -> 1200. Fractional amounts are rejected since yen has no
/// sub-unit, and so is any sign after the currency symbol.
pub fn parse_yen(input: &str) -> Result<Yen, ParseYenError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let input = input.strip_prefix('¥').unwrap_or(input);

    // Only digits and separators may remain; a second sign is malformed
    let digits: String = input.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseYenError::InvalidFormat);
    }

    let amount: i64 = digits.parse().map_err(|_| ParseYenError::InvalidFormat)?;

    Ok(if negative { -amount } else { amount })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseYenError {
    InvalidFormat,
}

impl fmt::Display for ParseYenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseYenError::InvalidFormat => write!(f, "invalid yen amount"),
        }
    }
}

impl std::error::Error for ParseYenError {}
