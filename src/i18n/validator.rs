//! Translation key parity validation.
//!
//! Every language should define the same keys as the base resource. Keys
//! that some languages legitimately lack can be listed as exceptions.

use crate::translator::TranslationMap;
use std::collections::BTreeSet;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Critical errors that indicate translation issues
    pub errors: Vec<String>,

    /// Non-critical warnings about potential issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator comparing the key set of a translation against a base one.
pub struct KeyParityValidator;

impl KeyParityValidator {
    /// Compare `candidate` against `base`.
    ///
    /// Keys unknown to the base are errors; base keys missing from the
    /// candidate are warnings. Keys in `exceptions` are ignored on both sides.
    pub fn validate(
        base: &TranslationMap,
        candidate: &TranslationMap,
        exceptions: &[&str],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        let base_keys = Self::filtered_keys(base, exceptions);
        let candidate_keys = Self::filtered_keys(candidate, exceptions);

        for key in candidate_keys.difference(&base_keys) {
            report
                .errors
                .push(format!("Translation key '{}' is not present in base language", key));
        }
        for key in base_keys.difference(&candidate_keys) {
            report
                .warnings
                .push(format!("Translation key '{}' is missing", key));
        }

        report
    }

    fn filtered_keys<'a>(map: &'a TranslationMap, exceptions: &[&str]) -> BTreeSet<&'a str> {
        map.keys()
            .map(String::as_str)
            .filter(|key| !exceptions.contains(key))
            .collect()
    }
}
