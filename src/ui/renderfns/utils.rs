use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format an amount as dollars with thousands separators, e.g. `$1,283.41`
pub fn format_amount(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = (cents / 100).to_string();

  let mut grouped = String::new();
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Display color for an approval state
pub fn approval_color(approved: bool) -> Color {
  if approved {
    Color::Green
  } else {
    Color::Yellow
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
  }

  #[test]
  fn test_format_amount() {
    assert_eq!(format_amount(0.0), "$0.00");
    assert_eq!(format_amount(9.5), "$9.50");
    assert_eq!(format_amount(1283.41), "$1,283.41");
    assert_eq!(format_amount(1234567.0), "$1,234,567.00");
    assert_eq!(format_amount(-42.1), "-$42.10");
  }

  #[test]
  fn test_approval_color() {
    assert_eq!(approval_color(true), Color::Green);
    assert_eq!(approval_color(false), Color::Yellow);
  }
}
