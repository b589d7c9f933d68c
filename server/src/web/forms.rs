// revstoran_server/src/web/forms.rs

//! Parsing of loosely-typed request fields. Clients may send numbers either as
//! JSON numbers or as the text a form field would carry.

use crate::errors::AppError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::num::IntErrorKind;
use std::str::FromStr;

pub const DEFAULT_RATING: i16 = 5;
pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Text of a scalar JSON field as a form would have submitted it. `None` for
/// null, arrays and objects.
pub fn field_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

/// Raw text for the cart quantity field; an absent field means "1".
pub fn quantity_text(value: Option<&Value>) -> String {
  value.and_then(field_text).unwrap_or_else(|| "1".to_string())
}

/// Parses an owner-entered price. A comma works as the decimal separator.
/// Rounded to cents; negative or unparseable input is rejected.
pub fn parse_price(raw: &str) -> Result<Decimal, AppError> {
  let normalized = raw.trim().replace(',', ".");
  let price = Decimal::from_str(&normalized).map_err(|_| invalid_price())?;
  if price.is_sign_negative() {
    return Err(invalid_price());
  }
  Ok(price.round_dp(2))
}

pub fn price_field(value: Option<&Value>) -> Result<Option<Decimal>, AppError> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(v) => {
      let text = field_text(v).ok_or_else(invalid_price)?;
      parse_price(&text).map(Some)
    }
  }
}

/// Review rating: unparseable input counts as 5, the result is clamped to [1, 5].
pub fn parse_rating(value: Option<&Value>) -> i16 {
  let text = match value.and_then(field_text) {
    Some(text) => text,
    None => return DEFAULT_RATING,
  };
  let raw = match text.trim().parse::<i64>() {
    Ok(v) => v,
    Err(e) => match e.kind() {
      IntErrorKind::PosOverflow => i64::MAX,
      IntErrorKind::NegOverflow => i64::MIN,
      _ => return DEFAULT_RATING,
    },
  };
  raw.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING)) as i16
}

/// Trimmed text field, `None` when absent.
pub fn trimmed(value: Option<&String>) -> Option<String> {
  value.map(|s| s.trim().to_string())
}

fn invalid_price() -> AppError {
  AppError::Validation("Invalid price.".to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;
  use serde_json::json;

  #[test]
  fn price_accepts_comma_and_dot() {
    assert_eq!(parse_price("12,50").unwrap(), dec!(12.50));
    assert_eq!(parse_price(" 12.5 ").unwrap(), dec!(12.5));
    assert_eq!(parse_price("7").unwrap(), dec!(7));
    assert_eq!(parse_price("3,999").unwrap(), dec!(4.00));
  }

  #[test]
  fn price_rejects_garbage() {
    for raw in ["", "abc", "1,2,3", "-4", "12 50"] {
      match parse_price(raw) {
        Err(AppError::Validation(msg)) => assert_eq!(msg, "Invalid price."),
        other => panic!("Expected invalid price for {:?}, got {:?}", raw, other),
      }
    }
  }

  #[test]
  fn price_field_reads_numbers_and_strings() {
    assert_eq!(price_field(Some(&json!(9.5))).unwrap(), Some(dec!(9.5)));
    assert_eq!(price_field(Some(&json!("9,75"))).unwrap(), Some(dec!(9.75)));
    assert_eq!(price_field(None).unwrap(), None);
    assert_eq!(price_field(Some(&Value::Null)).unwrap(), None);
    assert!(price_field(Some(&json!([1]))).is_err());
  }

  #[test]
  fn rating_defaults_and_clamps() {
    assert_eq!(parse_rating(None), 5);
    assert_eq!(parse_rating(Some(&json!("abc"))), 5);
    assert_eq!(parse_rating(Some(&json!("3"))), 3);
    assert_eq!(parse_rating(Some(&json!(4))), 4);
    assert_eq!(parse_rating(Some(&json!("0"))), 1);
    assert_eq!(parse_rating(Some(&json!(-2))), 1);
    assert_eq!(parse_rating(Some(&json!("9"))), 5);
    assert_eq!(parse_rating(Some(&json!("99999999999999999999"))), 5);
    assert_eq!(parse_rating(Some(&json!(4.5))), 5);
  }

  #[test]
  fn quantity_text_defaults_to_one() {
    assert_eq!(quantity_text(None), "1");
    assert_eq!(quantity_text(Some(&Value::Null)), "1");
    assert_eq!(quantity_text(Some(&json!(12))), "12");
    assert_eq!(quantity_text(Some(&json!(" 7 "))), " 7 ");
  }

  #[test]
  fn quantity_text_feeds_core_clamp() {
    let raw = quantity_text(Some(&json!(80)));
    let clamped = revstoran::parse_quantity(&raw).map(revstoran::clamp_quantity).unwrap_or(1);
    assert_eq!(clamped, revstoran::MAX_LINE_QUANTITY);
  }
}
