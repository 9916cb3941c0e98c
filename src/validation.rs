//! Input validation shared by driver, group, tracking and session identifiers.
//!
//! The detection engine accepts identifiers only if they pass a validity
//! check. The exact rules are an engine-side policy, so the check is exposed
//! as a trait the host can swap out; [`DefaultInputPolicy`] is the rule set
//! applied when no custom policy is supplied.

/// Maximum identifier length in characters.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validity policy for host-supplied identifiers.
pub trait InputPolicy {
    /// Check whether `input` is acceptable as an identifier.
    fn is_valid(&self, input: &str) -> bool;
}

/// The default identifier policy.
///
/// Accepts non-empty strings of at most [`MAX_IDENTIFIER_LENGTH`] characters
/// consisting of printable ASCII with no whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInputPolicy;

impl InputPolicy for DefaultInputPolicy {
    fn is_valid(&self, input: &str) -> bool {
        if input.is_empty() || input.chars().count() > MAX_IDENTIFIER_LENGTH {
            return false;
        }
        input.chars().all(|c| c.is_ascii_graphic())
    }
}

/// Check an identifier against the default policy.
///
/// Group ids, driver ids, tracking ids and session ids all go through this
/// check before being accepted.
pub fn is_valid_input_parameter(input: &str) -> bool {
    DefaultInputPolicy.is_valid(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_identifiers() {
        assert!(is_valid_input_parameter("EastCoast"));
        assert!(is_valid_input_parameter("fleet-042"));
        assert!(is_valid_input_parameter("driver_7@depot.example"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(!is_valid_input_parameter(""));
    }

    #[test]
    fn test_rejects_over_length() {
        let id = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(is_valid_input_parameter(&id));
        let id = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(!is_valid_input_parameter(&id));
    }

    #[test]
    fn test_rejects_whitespace_and_control() {
        assert!(!is_valid_input_parameter("east coast"));
        assert!(!is_valid_input_parameter("fleet\t1"));
        assert!(!is_valid_input_parameter("fleet\n"));
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(!is_valid_input_parameter("flotte-münchen"));
    }

    #[test]
    fn test_custom_policy_is_honored() {
        struct DigitsOnly;
        impl InputPolicy for DigitsOnly {
            fn is_valid(&self, input: &str) -> bool {
                !input.is_empty() && input.chars().all(|c| c.is_ascii_digit())
            }
        }

        assert!(DigitsOnly.is_valid("12345"));
        assert!(!DigitsOnly.is_valid("EastCoast"));
    }
}
