//! Isolation policy of the preview frame.
//!
//! The same flags are rendered two ways: as the iframe `sandbox` attribute
//! used by the host page, and as a `Content-Security-Policy: sandbox` header
//! for documents served directly (`/preview`).
//!
//! Top-level navigation and `allow-same-origin` are never granted. A preview
//! frame always runs in an opaque origin: its script cannot reach the host
//! page, the host's socket or its storage. Relative URLs in a `srcdoc` frame
//! still resolve against the host page, so workspace files load from the dev
//! server, which serves them to any origin.

use serde::{Deserialize, Serialize};

/// Capability flags of the preview browsing context.
///
/// ```toml
/// [preview.sandbox]
/// scripts = true
/// forms = true
/// popups = true
/// modals = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxPolicy {
    /// Run user script.
    pub scripts: bool,
    /// Submit forms.
    pub forms: bool,
    /// Open popups (`window.open`, `target="_blank"`).
    pub popups: bool,
    /// Allow `alert` / `confirm` / `prompt`.
    pub modals: bool,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            scripts: true,
            forms: true,
            popups: true,
            modals: true,
        }
    }
}

impl SandboxPolicy {
    /// No capabilities at all. Used for the theory panel.
    pub const fn locked() -> Self {
        Self {
            scripts: false,
            forms: false,
            popups: false,
            modals: false,
        }
    }

    /// Granted sandbox tokens in a stable order.
    pub fn tokens(&self) -> Vec<&'static str> {
        [
            (self.scripts, "allow-scripts"),
            (self.forms, "allow-forms"),
            (self.popups, "allow-popups"),
            (self.modals, "allow-modals"),
        ]
        .into_iter()
        .filter_map(|(granted, token)| granted.then_some(token))
        .collect()
    }

    /// Value of the iframe `sandbox` attribute. Empty means fully locked.
    pub fn to_attribute(&self) -> String {
        self.tokens().join(" ")
    }

    /// Value of a `Content-Security-Policy` header with the same capabilities.
    pub fn to_csp(&self) -> String {
        let tokens = self.tokens();
        if tokens.is_empty() {
            "sandbox".to_string()
        } else {
            format!("sandbox {}", tokens.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attribute() {
        assert_eq!(
            SandboxPolicy::default().to_attribute(),
            "allow-scripts allow-forms allow-popups allow-modals"
        );
    }

    #[test]
    fn test_never_grants_top_navigation() {
        let attr = SandboxPolicy::default().to_attribute();
        assert!(!attr.contains("top-navigation"));
    }

    #[test]
    fn test_preview_never_shares_host_origin() {
        let all = SandboxPolicy {
            scripts: true,
            forms: true,
            popups: true,
            modals: true,
        };
        assert!(!all.to_attribute().contains("allow-same-origin"));
        assert!(!all.to_csp().contains("allow-same-origin"));

        // Older config files may still carry the flag; it grants nothing
        let policy: SandboxPolicy = toml::from_str("same_origin = true").unwrap();
        assert!(!policy.to_attribute().contains("same-origin"));
    }

    #[test]
    fn test_locked_policy() {
        let policy = SandboxPolicy::locked();
        assert_eq!(policy.to_attribute(), "");
        assert_eq!(policy.to_csp(), "sandbox");
    }

    #[test]
    fn test_csp_header() {
        let policy = SandboxPolicy {
            popups: false,
            modals: false,
            ..SandboxPolicy::default()
        };
        assert_eq!(
            policy.to_csp(),
            "sandbox allow-scripts allow-forms"
        );
    }

    #[test]
    fn test_partial_deserialize() {
        let policy: SandboxPolicy = toml::from_str("forms = false").unwrap();
        assert!(!policy.forms);
        assert!(policy.scripts);
    }
}
