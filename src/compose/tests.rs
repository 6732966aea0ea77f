use super::*;
use crate::buffer::Snapshot;

fn snapshot(markup: &str, style: &str, script: &str) -> Snapshot {
    Snapshot::new(markup, style, script)
}

/// Byte offset of `needle`, panicking with the document on failure.
fn pos(doc: &str, needle: &str) -> usize {
    doc.find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{doc}"))
}

fn count(doc: &str, needle: &str) -> usize {
    doc.matches(needle).count()
}

// ----------------------------------------------------------------------------
// Fragments
// ----------------------------------------------------------------------------

#[test]
fn test_fragment_example() {
    let doc = compose(&snapshot("<p>Hi</p>", "p{color:red}", "console.log(1)"));

    // Markup inside body
    let body_open = pos(&doc, "<body>");
    let body_close = pos(&doc, "</body>");
    let p = pos(&doc, "<p>Hi</p>");
    assert!(body_open < p && p < body_close);

    // Style inside a style block in head
    let style_open = pos(&doc, "<style>");
    let css = pos(&doc, "p{color:red}");
    let style_close = pos(&doc, "</style>");
    let head_close = pos(&doc, "</head>");
    assert!(style_open < css && css < style_close && style_close < head_close);

    // Script wrapped in error handling, after the markup
    let try_at = pos(&doc, "try {\n");
    let log = pos(&doc, "console.log(1)");
    let catch_at = pos(&doc, "catch (error)");
    assert!(p < try_at && try_at < log && log < catch_at && catch_at < body_close);
}

#[test]
fn test_fragment_appears_verbatim() {
    let fragment = "<div class=\"card\">\n  <h2>Title</h2>\n  <!-- note -->\n</div>";
    let doc = compose(&snapshot(fragment, "", ""));
    let body = extract_body(&doc).unwrap();
    assert!(body.contains(fragment));
}

#[test]
fn test_fragment_with_body_tags_is_extracted() {
    let markup = "<head><title>ignored</title></head><body class=\"x\"><main>content</main></body>";
    let doc = compose(&snapshot(markup, "", ""));
    assert!(doc.contains("<main>content</main>"));
    assert!(!doc.contains("ignored"));
    assert_eq!(count(&doc, "<body"), 1);
}

#[test]
fn test_fragment_unclosed_body_falls_back_to_whole_markup() {
    let markup = "<body><p>never closed";
    let doc = compose(&snapshot(markup, "", ""));
    assert!(doc.contains(markup));
}

#[test]
fn test_empty_buffers_produce_minimal_document() {
    let doc = compose(&Snapshot::default());
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<head>"));
    assert!(doc.contains("<body>"));
    assert!(doc.trim_end().ends_with("</html>"));
    assert_eq!(count(&doc, "try {\n"), 1);
}

#[test]
fn test_reset_toggle_and_title() {
    let options = ComposeOptions {
        title: "Card <demo>".into(),
        reset: false,
    };
    let doc = options.compose(&snapshot("<p>x</p>", "p{margin:1px}", ""));
    assert!(!doc.contains("box-sizing"));
    assert!(doc.contains("<title>Card &lt;demo&gt;</title>"));

    let doc = compose(&snapshot("<p>x</p>", "p{margin:1px}", ""));
    assert!(pos(&doc, "box-sizing") < pos(&doc, "p{margin:1px}"));
}

// ----------------------------------------------------------------------------
// Complete documents
// ----------------------------------------------------------------------------

#[test]
fn test_complete_document_blocks_replaced_without_duplicates() {
    let markup = "<!DOCTYPE html>\n<html>\n<head>\n<style>old{}</style>\n</head>\n<body>\n<p>x</p>\n<script>old()</script>\n</body>\n</html>";
    let doc = compose(&snapshot(markup, "new{}", "fresh()"));

    assert!(!doc.contains("old{}"));
    assert!(!doc.contains("old()"));
    assert_eq!(count(&doc, "<style>"), 1);
    assert_eq!(count(&doc, "try {\n"), 1);

    // Style content is exactly the buffer
    let style_open = pos(&doc, "<style>") + "<style>".len();
    let style_close = pos(&doc, "</style>");
    assert_eq!(doc[style_open..style_close].trim(), "new{}");

    // Script block holds the guarded buffer
    let guarded = guard_script("fresh()");
    assert!(doc.contains(&guarded));
}

#[test]
fn test_complete_document_keeps_skeleton() {
    let markup = "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<title>Mine</title>\n</head>\n<body>\n<h1>Hello</h1>\n</body>\n</html>";
    let doc = compose(&snapshot(markup, "h1{}", "hi()"));

    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<html lang=\"fr\">"));
    assert!(doc.contains("<title>Mine</title>"));
    assert!(!doc.contains("box-sizing"));
    assert_eq!(count(&doc, "<body>"), 1);
}

#[test]
fn test_complete_document_missing_blocks_are_injected() {
    let markup = "<!DOCTYPE html>\n<html>\n<head>\n<title>t</title>\n</head>\n<body>\n<h1>Hello</h1>\n</body>\n</html>";
    let doc = compose(&snapshot(markup, "h1{color:blue}", "startDemo()"));

    let css = pos(&doc, "h1{color:blue}");
    let head_close = pos(&doc, "</head>");
    assert!(css < head_close);

    let h1 = pos(&doc, "<h1>Hello</h1>");
    let call = pos(&doc, "startDemo()");
    let body_close = pos(&doc, "</body>");
    assert!(h1 < call && call < body_close);
}

#[test]
fn test_complete_document_extra_blocks_removed() {
    let markup = "<html><head><style>.first{}</style><style>.second{}</style></head><body><script>firstCall()</script><script>secondCall()</script></body></html>";
    let doc = compose(&snapshot(markup, ".third{}", "thirdCall()"));

    assert_eq!(count(&doc, "<style>"), 1);
    assert!(!doc.contains(".first{}") && !doc.contains(".second{}"));
    assert!(!doc.contains("firstCall()") && !doc.contains("secondCall()"));
    assert_eq!(count(&doc, "thirdCall()"), 1);
}

#[test]
fn test_complete_document_external_scripts_untouched() {
    let markup = "<html><head><script src=\"https://cdn.example/lib.js\"></script></head><body></body></html>";
    let doc = compose(&snapshot(markup, "", "useLib()"));

    assert!(doc.contains("<script src=\"https://cdn.example/lib.js\"></script>"));
    assert!(pos(&doc, "lib.js") < pos(&doc, "useLib()"));
}

#[test]
fn test_complete_document_data_blocks_untouched() {
    let data = r#"<script type="application/ld+json">{"a":1}</script>"#;
    let markup = format!("<html><head>{data}</head><body><p>x</p></body></html>");
    let doc = compose(&snapshot(&markup, "", "alert(1)"));

    assert!(doc.contains(data));
    // The user script gets its own executable block before </body>
    let call = pos(&doc, "alert(1)");
    let block = doc[..call].rfind("<script>").unwrap();
    assert!(pos(&doc, "<p>x</p>") < block && call < pos(&doc, "</body>"));
}

#[test]
fn test_complete_document_comments_untouched() {
    let markup = "<html><head><!-- <style>old{}</style> --></head><body><!-- <script>old()</script> --><p>x</p></body></html>";
    let doc = compose(&snapshot(markup, "new{}", "alert(1)"));

    assert!(doc.contains("<!-- <script>old()</script> -->"));
    assert!(doc.contains("<!-- <style>old{}</style> -->"));

    // Buffers land outside the comments
    let comment_end = doc.rfind("-->").unwrap();
    assert!(comment_end < pos(&doc, "alert(1)"));
    assert!(pos(&doc, "new{}") > pos(&doc, "<style>old{}</style> -->"));
}

#[test]
fn test_runtime_survives_head_text_in_removed_script() {
    let markup = "<html><script>a()</script><script>var h = '<head>';</script><body></body></html>";
    let doc = compose(&snapshot(markup, "", "userCode()"));

    assert!(doc.contains("unhandledrejection"));
    assert!(!doc.contains("var h"));
    assert!(pos(&doc, REPORT_HOOK) < pos(&doc, "userCode()"));
}

#[test]
fn test_runtime_precedes_user_script() {
    for markup in [
        "<p>x</p>",
        "<!DOCTYPE html><html><head></head><body></body></html>",
        "<html><body><script>old()</script></body></html>",
    ] {
        let doc = compose(&snapshot(markup, "", "userCode()"));
        assert!(pos(&doc, REPORT_HOOK) < pos(&doc, "userCode()"), "{markup}");
        assert!(doc.contains("addEventListener"), "{markup}");
    }
}

// ----------------------------------------------------------------------------
// Robustness
// ----------------------------------------------------------------------------

#[test]
fn test_compose_is_deterministic() {
    let inputs = [
        snapshot("<p>Hi</p>", "p{color:red}", "console.log(1)"),
        snapshot("<!DOCTYPE html><html><body><p>x", "", "throw new Error('x')"),
        snapshot("", "", ""),
        snapshot("<div><span></div>", "}}}", "function ("),
    ];
    for input in &inputs {
        assert_eq!(compose(input), compose(input));
    }
}

#[test]
fn test_throwing_script_keeps_markup_and_style() {
    let doc = compose(&snapshot("<p>still here</p>", "p{color:red}", "throw new Error('x')"));

    assert!(doc.contains("<p>still here</p>"));
    assert!(pos(&doc, "p{color:red}") < pos(&doc, "</head>"));
    // The throw sits inside the guard, and the guard reports
    let try_at = pos(&doc, "try {\n");
    let throw_at = pos(&doc, "throw new Error('x')");
    let report = doc[throw_at..].find(REPORT_HOOK);
    assert!(try_at < throw_at && report.is_some());
}

#[test]
fn test_malformed_markup_does_not_panic() {
    for markup in [
        "<",
        "<html",
        "<!DOCTYPE",
        "<html><head><style>unclosed",
        "</body></body><body>",
        "<script>never closed",
        "<html><head></head></html><body>",
        "ünïcödé <bödy> ✓",
    ] {
        let doc = compose(&snapshot(markup, "a{}", "b()"));
        assert!(doc.contains("b()"), "{markup}");
        assert!(doc.contains("a{}"), "{markup}");
    }
}

#[test]
fn test_user_script_cannot_close_its_block() {
    let doc = compose(&snapshot("<p>x</p>", "", "var s = '</script><p>injected</p>';"));
    assert!(!doc.contains("</script><p>injected"));
    assert!(doc.contains("<\\/script><p>injected</p>"));
}
