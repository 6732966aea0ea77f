//! Script and style text preparation for injection.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Global hook installed by the preview runtime (`embed/preview/runtime.js`).
pub const REPORT_HOOK: &str = "__techlearnReport";

static SCRIPT_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</(script)").unwrap());
static STYLE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</(style)").unwrap());

/// Keep user script text from closing its own `<script>` element.
///
/// `</script` can only appear inside JS strings, regexes or comments, where
/// `<\/script` means the same thing.
pub fn escape_script(script: &str) -> Cow<'_, str> {
    SCRIPT_CLOSE.replace_all(script, r"<\/$1")
}

/// Keep user style text from closing its own `<style>` element.
pub fn escape_style(style: &str) -> Cow<'_, str> {
    STYLE_CLOSE.replace_all(style, r"<\/$1")
}

/// Wrap user script so a thrown error is reported instead of aborting silently.
pub fn guard_script(script: &str) -> String {
    let body = escape_script(script);
    format!(
        "try {{\n{body}\n}} catch (error) {{\n  (window.{REPORT_HOOK} || console.error)(error);\n}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_wraps_in_try_catch() {
        let guarded = guard_script("console.log(1)");
        let try_at = guarded.find("try {").unwrap();
        let body_at = guarded.find("console.log(1)").unwrap();
        let catch_at = guarded.find("catch (error)").unwrap();
        assert!(try_at < body_at && body_at < catch_at);
        assert!(guarded.contains(REPORT_HOOK));
    }

    #[test]
    fn test_escape_script_close_tag() {
        assert_eq!(
            escape_script("var s = '</script><b>';"),
            "var s = '<\\/script><b>';"
        );
        assert_eq!(escape_script("x = '</SCRIPT>'"), "x = '<\\/SCRIPT>'");
        assert!(matches!(escape_script("plain()"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_style_close_tag() {
        assert_eq!(
            escape_style("/* </style> */ p{}"),
            "/* <\\/style> */ p{}"
        );
    }
}
