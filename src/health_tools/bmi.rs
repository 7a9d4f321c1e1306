//! Body-mass-index calculator.

use serde::Serialize;

use super::ToolError;

pub const MSG_INVALID: &str = "Please enter valid height and weight values.";
pub const MSG_OUT_OF_RANGE: &str =
    "Please check your values. Height should be in centimeters and weight in kilograms.";
pub const FOOTNOTE: &str =
    "BMI is a general indicator. Consult healthcare providers for personalized advice.";

pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::Underweight => "Consider consulting a healthcare provider about healthy weight gain strategies.",
            Self::Normal => "Great! Maintain your current lifestyle with regular exercise and balanced nutrition.",
            Self::Overweight => "Consider lifestyle changes including regular exercise and dietary modifications.",
            Self::Obese => "Please consult with a healthcare provider for a comprehensive health assessment.",
        }
    }

    /// Result panel class: `normal`, `warning` or `danger`.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Underweight | Self::Overweight => "warning",
            Self::Obese => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiResult {
    /// One-decimal display value.
    pub fn display(&self) -> String {
        format!("{:.1}", self.bmi)
    }
}

pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiResult, ToolError> {
    if !(height_cm > 0.0 && weight_kg > 0.0) || !height_cm.is_finite() || !weight_kg.is_finite() {
        return Err(ToolError::InvalidInput(MSG_INVALID.to_string()));
    }
    if height_cm > MAX_HEIGHT_CM || weight_kg > MAX_WEIGHT_KG {
        return Err(ToolError::InvalidInput(MSG_OUT_OF_RANGE.to_string()));
    }
    let meters = height_cm / 100.0;
    let bmi = weight_kg / (meters * meters);
    Ok(BmiResult {
        bmi,
        category: BmiCategory::from_bmi(bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_weight() {
        let r = calculate_bmi(175.0, 70.0).unwrap();
        assert_eq!(r.display(), "22.9");
        assert_eq!(r.category.label(), "Normal weight");
        assert_eq!(r.category.css_class(), "normal");
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn rejects_non_positive() {
        for (h, w) in [(0.0, 70.0), (170.0, 0.0), (-5.0, 70.0), (f64::NAN, 70.0)] {
            assert_eq!(
                calculate_bmi(h, w).unwrap_err(),
                ToolError::InvalidInput(MSG_INVALID.into())
            );
        }
    }

    #[test]
    fn rejects_out_of_range_units() {
        assert_eq!(
            calculate_bmi(5.9, 160.0).map(|r| r.category),
            Ok(BmiCategory::Obese)
        );
        assert_eq!(
            calculate_bmi(350.0, 70.0).unwrap_err(),
            ToolError::InvalidInput(MSG_OUT_OF_RANGE.into())
        );
        assert_eq!(
            calculate_bmi(170.0, 600.0).unwrap_err(),
            ToolError::InvalidInput(MSG_OUT_OF_RANGE.into())
        );
    }
}
