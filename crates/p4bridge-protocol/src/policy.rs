use serde::{Deserialize, Serialize};

/// Aggregate error/warning view of a completed result, the only thing the
/// exception policy needs to see.
pub trait CommandOutcome {
    fn has_errors(&self) -> bool;
    fn has_warnings(&self) -> bool;
}

/// When a completed command's result should be converted into an error.
///
/// Server diagnostics are data, not failures; this policy is the one place
/// they become failures. `NoExceptionOnErrors` exists for probing
/// operations (login checks and the like) where the caller inspects the
/// result itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionLevel {
    /// Never raise, whatever the result holds
    NoExceptionOnErrors,
    /// Raise on errors; warnings alone pass
    #[default]
    NoExceptionOnWarnings,
    /// Raise on errors or warnings
    ExceptionOnBothErrorsAndWarnings,
}

impl ExceptionLevel {
    pub fn should_raise(self, outcome: &dyn CommandOutcome) -> bool {
        match self {
            ExceptionLevel::NoExceptionOnErrors => false,
            ExceptionLevel::NoExceptionOnWarnings => outcome.has_errors(),
            ExceptionLevel::ExceptionOnBothErrorsAndWarnings => {
                outcome.has_errors() || outcome.has_warnings()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Outcome {
        errors: bool,
        warnings: bool,
    }

    impl CommandOutcome for Outcome {
        fn has_errors(&self) -> bool {
            self.errors
        }

        fn has_warnings(&self) -> bool {
            self.warnings
        }
    }

    #[test]
    fn error_and_warning_raise_except_at_lowest_level() {
        let outcome = Outcome {
            errors: true,
            warnings: true,
        };
        assert!(!ExceptionLevel::NoExceptionOnErrors.should_raise(&outcome));
        assert!(ExceptionLevel::NoExceptionOnWarnings.should_raise(&outcome));
        assert!(ExceptionLevel::ExceptionOnBothErrorsAndWarnings.should_raise(&outcome));
    }

    #[test]
    fn warning_alone_raises_only_at_strictest_level() {
        let outcome = Outcome {
            errors: false,
            warnings: true,
        };
        assert!(!ExceptionLevel::NoExceptionOnErrors.should_raise(&outcome));
        assert!(!ExceptionLevel::NoExceptionOnWarnings.should_raise(&outcome));
        assert!(ExceptionLevel::ExceptionOnBothErrorsAndWarnings.should_raise(&outcome));
    }

    #[test]
    fn clean_outcome_never_raises() {
        let outcome = Outcome {
            errors: false,
            warnings: false,
        };
        assert!(!ExceptionLevel::NoExceptionOnErrors.should_raise(&outcome));
        assert!(!ExceptionLevel::NoExceptionOnWarnings.should_raise(&outcome));
        assert!(!ExceptionLevel::ExceptionOnBothErrorsAndWarnings.should_raise(&outcome));
    }

    #[test]
    fn default_level_is_no_exception_on_warnings() {
        assert_eq!(ExceptionLevel::default(), ExceptionLevel::NoExceptionOnWarnings);
    }
}
