use crate::error::{MixCheckError, Result};
use crate::presentation::PATIENT_FACTORS;

const MAX_DRUG_NAME_LEN: usize = 120;

/// Validates user input at the HTTP boundary. The prompt layer downstream
/// assumes non-empty trimmed drug names and does not re-validate.
pub struct InputValidator {
    max_drug_name_len: usize,
}

impl InputValidator {
    pub fn new() -> Self {
        Self {
            max_drug_name_len: MAX_DRUG_NAME_LEN,
        }
    }

    /// Trimmed, non-empty, bounded drug name.
    pub fn validate_drug_name(&self, field: &str, value: &str) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(MixCheckError::Validation(format!(
                "{field} must not be empty"
            )));
        }
        if trimmed.len() > self.max_drug_name_len {
            return Err(MixCheckError::Validation(format!(
                "{field} exceeds {} characters",
                self.max_drug_name_len
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Factors must come from the fixed tag vocabulary.
    pub fn validate_factors(&self, factors: &[String]) -> Result<Vec<String>> {
        for factor in factors {
            if !PATIENT_FACTORS.contains(&factor.as_str()) {
                return Err(MixCheckError::Validation(format!(
                    "unknown patient factor: {factor}"
                )));
            }
        }
        Ok(factors.to_vec())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drug_name_trimmed() {
        let validator = InputValidator::new();
        let name = validator
            .validate_drug_name("drugA", "  Warfarin ")
            .expect("valid name");
        assert_eq!(name, "Warfarin");
    }

    #[test]
    fn test_empty_drug_name_rejected() {
        let validator = InputValidator::new();
        assert!(validator.validate_drug_name("drugA", "   ").is_err());
        assert!(validator.validate_drug_name("drugB", "").is_err());
    }

    #[test]
    fn test_oversized_drug_name_rejected() {
        let validator = InputValidator::new();
        let long = "x".repeat(MAX_DRUG_NAME_LEN + 1);
        assert!(validator.validate_drug_name("drugA", &long).is_err());
    }

    #[test]
    fn test_factors_checked_against_vocabulary() {
        let validator = InputValidator::new();
        let known = vec!["Pregnant".to_string(), "Age 65+".to_string()];
        assert_eq!(validator.validate_factors(&known).expect("known tags"), known);

        let unknown = vec!["Smoker".to_string()];
        assert!(validator.validate_factors(&unknown).is_err());
    }
}
