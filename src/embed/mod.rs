//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `preview` - Error-reporting runtime injected into every preview document
//! - `serve` - Host page served by the playground (host.html, host.js)
//!
//! Built-in exercise sources live in `exercises/` and are pulled in by
//! [`crate::exercise::Catalog`].
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{HOST_JS, HostJsVars};
//!
//! // Render host JS with the WebSocket port
//! let js = HOST_JS.render(&HostJsVars { ws_port: 5278 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod preview {
    /// Minified error-reporting runtime. Defines `window.__techlearnReport`
    /// and listens for `error` / `unhandledrejection`.
    pub const RUNTIME_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/runtime.min.js"));
}

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for host.js.
    pub struct HostJsVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HostJsVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__TECHLEARN_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Variables for host.html.
    pub struct HostHtmlVars<'a> {
        pub title: &'a str,
        pub version: &'a str,
    }

    impl TemplateVars for HostHtmlVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &crate::utils::html::escape(self.title))
                .replace("__VERSION__", self.version)
        }
    }

    /// Host page template.
    pub const HOST_HTML: Template<HostHtmlVars<'static>> =
        Template::new(include_str!("serve/host.html"));

    /// Host page script with WebSocket port injection. The stylesheet is
    /// inlined at build time.
    pub const HOST_JS: Template<HostJsVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/host.min.js")));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_defines_report_hook() {
        let js = preview::RUNTIME_JS;
        assert!(js.contains("__techlearnReport"));
        assert!(js.contains("unhandledrejection"));
        assert!(js.contains("Preview Error:"));
        assert!(!js.to_ascii_lowercase().contains("</script"));
    }

    #[test]
    fn test_host_js_with_vars() {
        let rendered = serve::HOST_JS.render(&serve::HostJsVars { ws_port: 35729 });
        assert!(rendered.contains("35729"));
        assert!(!rendered.contains("__TECHLEARN_WS_PORT__"));
        assert!(!rendered.contains("__TECHLEARN_HOST_CSS__"));
    }

    #[test]
    fn test_host_html_template() {
        let html = serve::HOST_HTML.render(&serve::HostHtmlVars {
            title: "Cards & Grids",
            version: "1.2.3",
        });
        assert!(html.contains("<title>Cards &amp; Grids</title>"));
        assert!(html.contains("v1.2.3"));
        assert!(html.contains("/__techlearn/host.js"));
    }
}
