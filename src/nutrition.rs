use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// The four tracked nutrition quantities. Stored values are always
/// non-negative; a `MacroTotals` produced by [`Sub`] is a delta and may
/// carry negative components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTotals {
    pub const ZERO: MacroTotals = MacroTotals {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    /// Stored macros must be finite and >= 0. Returns the offending field
    /// name so validation messages can point at it.
    pub fn validate(&self) -> Result<(), &'static str> {
        for (name, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(name);
            }
        }
        Ok(())
    }
}

impl Sub for MacroTotals {
    type Output = MacroTotals;

    fn sub(self, old: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories - old.calories,
            protein: self.protein - old.protein,
            carbs: self.carbs - old.carbs,
            fat: self.fat - old.fat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_new_minus_old() {
        let old = MacroTotals::new(300.0, 10.0, 50.0, 5.0);
        let new = MacroTotals::new(200.0, 5.0, 20.0, 8.0);
        let delta = new - old;
        assert_eq!(delta, MacroTotals::new(-100.0, -5.0, -30.0, 3.0));
    }

    #[test]
    fn validate_accepts_zero_and_positive() {
        assert!(MacroTotals::ZERO.validate().is_ok());
        assert!(MacroTotals::new(300.0, 10.0, 50.0, 5.0).validate().is_ok());
    }

    #[test]
    fn validate_names_the_bad_field() {
        assert_eq!(
            MacroTotals::new(-1.0, 0.0, 0.0, 0.0).validate(),
            Err("calories")
        );
        assert_eq!(
            MacroTotals::new(0.0, 0.0, f64::NAN, 0.0).validate(),
            Err("carbs")
        );
        assert_eq!(
            MacroTotals::new(0.0, 0.0, 0.0, f64::INFINITY).validate(),
            Err("fat")
        );
    }
}
