//! Extraction of the first fenced code block from free text.

const MARKER: &str = "```";
const HINTS: &[&str] = &["python", "java", "c", "cpp", "javascript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    HintCheck,
    Inside,
}

/// Returns the text between the first two fence markers, minus a leading
/// language-hint line. `None` unless the block closes and holds some code.
pub fn extract_code(reply: &str) -> Option<String> {
    let mut state = State::Outside;
    let mut rest = reply;

    loop {
        state = match state {
            State::Outside => {
                let at = rest.find(MARKER)?;
                rest = &rest[at + MARKER.len()..];
                State::HintCheck
            }
            State::HintCheck => {
                let line_len = [rest.find('\n'), rest.find(MARKER)]
                    .into_iter()
                    .flatten()
                    .min()
                    .unwrap_or(rest.len());
                if is_language_hint(&rest[..line_len]) {
                    rest = &rest[line_len..];
                    rest = rest.strip_prefix('\n').unwrap_or(rest);
                }
                State::Inside
            }
            State::Inside => {
                let end = rest.find(MARKER)?;
                let body = &rest[..end];
                return (!body.trim().is_empty()).then(|| body.to_string());
            }
        };
    }
}

/// A line led by a language token such as `python`, `Cpp`, `c++` or
/// `python3 title`. Code like `c = 1` or `print(1)` is not a hint.
fn is_language_hint(line: &str) -> bool {
    let line = line.trim();
    let (token, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let token_chars_ok = token.chars().all(|c| c.is_ascii_alphanumeric() || "+#".contains(c));
    if token.is_empty() || !token_chars_ok {
        return false;
    }
    let rest = rest.trim_start();
    if rest.starts_with(|c: char| !c.is_alphanumeric()) {
        return false;
    }
    let lower = token.to_ascii_lowercase();
    HINTS.iter().any(|h| {
        lower
            .strip_prefix(h)
            .is_some_and(|tail| tail.chars().all(|c| c.is_ascii_digit() || "+#".contains(c)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_hint_is_stripped() {
        let reply = "The name is undefined.\n```python\nprint(1)```\nHope this helps.";
        assert_eq!(extract_code(reply).as_deref(), Some("print(1)"));
    }

    #[test]
    fn test_hint_case_insensitive() {
        let reply = "```CPP\nint main() { return 0; }\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("int main() { return 0; }\n"));
        let reply = "```Java\nclass A {}\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("class A {}\n"));
    }

    #[test]
    fn test_block_without_hint_is_kept() {
        let reply = "fix:\n```\nx = 1\nprint(x)\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("\nx = 1\nprint(x)\n"));
    }

    #[test]
    fn test_first_code_line_is_not_a_hint() {
        // "print(1)" is code, not a bare language token.
        let reply = "```print(1)\nprint(2)\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("print(1)\nprint(2)\n"));
    }

    #[test]
    fn test_zero_markers() {
        assert_eq!(extract_code("Just add a colon after the if statement."), None);
    }

    #[test]
    fn test_unclosed_block() {
        assert_eq!(extract_code("```python\nprint(1)\n"), None);
    }

    #[test]
    fn test_only_first_block_is_used() {
        let reply = "```python\na = 1\n```\nthen\n```python\nb = 2\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("a = 1\n"));
    }

    #[test]
    fn test_hint_only_block_has_no_code() {
        assert_eq!(extract_code("```python```"), None);
        assert_eq!(extract_code("```python\n```"), None);
        assert_eq!(extract_code("```\n  \n```"), None);
    }

    #[test]
    fn test_crlf_hint_line() {
        let reply = "```javascript\r\nconsole.log(1);\r\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("console.log(1);\r\n"));
    }

    #[test]
    fn test_language_hint_tokens() {
        assert!(is_language_hint("python"));
        assert!(is_language_hint("python3"));
        assert!(is_language_hint("c++"));
        assert!(is_language_hint(" JavaScript "));
        assert!(!is_language_hint("rust"));
        assert!(!is_language_hint("print(1)"));
        assert!(!is_language_hint("class Main {"));
        assert!(!is_language_hint("c = 1"));
        assert!(!is_language_hint("const x = 1;"));
        assert!(!is_language_hint(""));
    }

    #[test]
    fn test_hint_with_trailing_text_is_stripped() {
        assert!(is_language_hint("python3 title"));
        assert!(is_language_hint("cpp main.cpp"));
        let reply = "```python3 title\nx=1\n```";
        assert_eq!(extract_code(reply).as_deref(), Some("x=1\n"));
    }
}
