//! Out-of-band confirmation before destructive actions.

/// Asks the operator to approve an action.
///
/// Closures taking the prompt and returning the answer implement it too.
pub trait Confirm {
    /// Ask `prompt`; `true` means go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Approves everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Interpret a typed answer. Accepts English and Spanish yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm.confirm("delete?"));
    }

    #[test]
    fn test_closure_confirm_sees_prompt() {
        let mut seen = String::new();
        let mut decline = |prompt: &str| {
            seen = prompt.to_string();
            false
        };
        assert!(!decline.confirm("Delete assignment 3?"));
        assert_eq!(seen, "Delete assignment 3?");
    }

    #[test]
    fn test_is_affirmative() {
        for yes in ["y", "YES", " s ", "Si", "sí"] {
            assert!(is_affirmative(yes), "{yes}");
        }
        for no in ["", "n", "no", "maybe"] {
            assert!(!is_affirmative(no), "{no}");
        }
    }
}
