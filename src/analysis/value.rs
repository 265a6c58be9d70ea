use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde_json::Value;

/// Anything a stored measurement cell can hold.
///
/// A cell converts to `Some(f64)` only when it carries a finite, non-zero number.
/// Zero is the storage default for an unmeasured cell, so it is reported as absent.
/// Genuine zero measurements are lost by this rule; clients depend on it.
pub trait Measurement {
    fn measurement(&self) -> Option<f64>;
}

fn valid(f: f64) -> Option<f64> {
    if f == 0.0 || !f.is_finite() {
        None
    } else {
        Some(f)
    }
}

impl Measurement for f64 {
    fn measurement(&self) -> Option<f64> {
        valid(*self)
    }
}

impl Measurement for i32 {
    fn measurement(&self) -> Option<f64> {
        valid(f64::from(*self))
    }
}

impl Measurement for i64 {
    fn measurement(&self) -> Option<f64> {
        valid(*self as f64)
    }
}

impl Measurement for BigDecimal {
    fn measurement(&self) -> Option<f64> {
        self.to_f64().and_then(valid)
    }
}

impl Measurement for str {
    fn measurement(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        // Decimal columns may come back as text; accept a comma as decimal mark too
        let normalized = trimmed.replace(',', ".");
        BigDecimal::from_str(&normalized)
            .ok()
            .and_then(|d| d.measurement())
    }
}

impl Measurement for Value {
    fn measurement(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64().and_then(valid),
            Value::String(s) => s.as_str().measurement(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl<T: Measurement + ?Sized> Measurement for &T {
    fn measurement(&self) -> Option<f64> {
        (**self).measurement()
    }
}

impl<T: Measurement> Measurement for Option<T> {
    fn measurement(&self) -> Option<f64> {
        self.as_ref().and_then(Measurement::measurement)
    }
}

/// Coerce a raw stored value into a valid measurement, or `None`.
pub fn measurement<T: Measurement + ?Sized>(raw: &T) -> Option<f64> {
    raw.measurement()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_is_absent() {
        assert_eq!(measurement(&json!(0)), None);
        assert_eq!(measurement(&json!(0.0)), None);
        assert_eq!(measurement(&json!("0.0")), None);
        assert_eq!(measurement(&0_i32), None);
        assert_eq!(measurement(&BigDecimal::from(0)), None);
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(measurement(&json!(80)), Some(80.0));
        assert_eq!(measurement(&json!(-4)), Some(-4.0));
        assert_eq!(measurement(&json!(37.5)), Some(37.5));
        assert_eq!(measurement(&Some(12_i64)), Some(12.0));
    }

    #[test]
    fn decimal_text_is_parsed() {
        assert_eq!(measurement(&json!("41.5")), Some(41.5));
        assert_eq!(measurement(&json!(" 41,5 ")), Some(41.5));
        let d = BigDecimal::from_str("3.2").unwrap();
        assert_eq!(measurement(&d), Some(3.2));
    }

    #[test]
    fn uninterpretable_values_are_absent() {
        assert_eq!(measurement(&Value::Null), None);
        assert_eq!(measurement(&json!("Ja")), None);
        assert_eq!(measurement(&json!("")), None);
        assert_eq!(measurement(&json!(true)), None);
        assert_eq!(measurement(&json!([1, 2])), None);
        assert_eq!(measurement(&None::<i32>), None);
        assert_eq!(measurement(&f64::NAN), None);
        assert_eq!(measurement(&f64::INFINITY), None);
    }
}
