//! Canned explanations for common errors, usable without network access.

#[derive(Debug, PartialEq, Eq)]
pub struct OfflineFix {
    pub pattern: &'static str,
    pub explanation: &'static str,
    pub fix: &'static str,
}

/// Checked in order; the first pattern found in the error text wins.
pub const PATTERNS: &[OfflineFix] = &[
    OfflineFix {
        pattern: "SyntaxError: expected ':'",
        explanation: "You probably forgot a colon (:) at the end of a statement \
                      like for, if, while, or def.",
        fix: "Add a colon at the end of the statement. Example:\nfor i in range(5):",
    },
    OfflineFix {
        pattern: "IndentationError:",
        explanation: "Python relies on indentation (spaces or tabs). \
                      Make sure your code blocks are properly indented.",
        fix: "Indent the lines that belong to the same block with the same number of spaces.",
    },
    OfflineFix {
        pattern: "NameError:",
        explanation: "You're trying to use a variable or function that hasn't been defined yet.",
        fix: "Make sure you define the variable or function before using it.",
    },
    OfflineFix {
        pattern: "TypeError:",
        explanation: "You're using a value in a way that's not allowed for its type \
                      (e.g., adding a string to a number).",
        fix: "Check the types of your variables and use them in compatible operations.",
    },
];

pub fn lookup(stderr: &str) -> Option<&'static OfflineFix> {
    PATTERNS.iter().find(|p| stderr.contains(p.pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_anywhere_in_text() {
        let stderr = "  File \"x.py\", line 2\n    print(1)\n    ^\n\
                      IndentationError: expected an indented block after 'if' \
                      statement on line 1\n";
        let hit = lookup(stderr).unwrap();
        assert_eq!(hit.pattern, "IndentationError:");
        assert!(hit.explanation.contains("indentation"));
    }

    #[test]
    fn test_first_pattern_in_table_order_wins() {
        // Both TypeError and NameError appear; NameError comes first in the table.
        let stderr = "TypeError: unsupported operand\nNameError: name 'x' is not defined";
        assert_eq!(lookup(stderr).unwrap().pattern, "NameError:");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(lookup("ZeroDivisionError: division by zero"), None);
        assert_eq!(lookup(""), None);
        // Match is case-sensitive.
        assert_eq!(lookup("nameerror: lower case"), None);
    }

    #[test]
    fn test_missing_colon() {
        let hit = lookup("SyntaxError: expected ':'").unwrap();
        assert!(hit.fix.contains("for i in range(5):"));
    }
}
