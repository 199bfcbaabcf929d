//! Regular expression validation for string values

use metamodel_core::prelude::*;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Validates string values against a compiled pattern
///
/// The pattern is searched for anywhere in the value; anchor it with `^`/`$`
/// to require a whole-value match.
#[derive(Debug, Clone)]
pub struct StringValidator {
    pattern: String,
    flags: String,
    regex: Regex,
}

impl StringValidator {
    /// Compile a pattern with its flags
    ///
    /// Supported flags: `i` (case-insensitive), `m` (multi-line), `s` (dot
    /// matches newline), `u` (unicode, always enabled). `g` and `y` have no
    /// meaning for a single match test and are accepted.
    ///
    /// # Errors
    ///
    /// Returns `MetamodelError::InvalidValidatorSpec` for an unknown flag or a
    /// pattern that fails to compile
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let mut builder = RegexBuilder::new(pattern);
        builder.unicode(true);

        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'u' | 'g' | 'y' => {}
                other => {
                    return Err(MetamodelError::InvalidValidatorSpec {
                        message: format!("unsupported regular expression flag '{other}'"),
                        pattern: Some(pattern.to_string()),
                    });
                }
            }
        }

        let regex = builder.build().map_err(|e| MetamodelError::InvalidValidatorSpec {
            message: format!("pattern failed to compile: {e}"),
            pattern: Some(pattern.to_string()),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    /// Source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Source flags
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Whether the pattern matches a string
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Check a value against the pattern
    ///
    /// # Errors
    ///
    /// Returns a `ValidationFailure` if the value is not a string or does not match
    pub fn validate(&self, identifier: &str, value: &Value) -> std::result::Result<(), ValidationFailure> {
        match value {
            Value::String(s) if self.is_match(s) => Ok(()),
            Value::String(_) => Err(ValidationFailure::new(
                identifier,
                value.clone(),
                format!("does not match the regular expression {self}"),
            )),
            _ => Err(ValidationFailure::new(
                identifier,
                value.clone(),
                "is not a string",
            )),
        }
    }
}

impl PartialEq for StringValidator {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

impl fmt::Display for StringValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}
