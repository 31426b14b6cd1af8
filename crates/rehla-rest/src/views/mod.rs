//! HTML views.
//!
//! Pages are plain string builders. Every value that came from a user or
//! the store goes through [`html_escape`].

pub mod dashboard;
pub mod web;

/// Escapes text for HTML element content and attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Short alias used inside `format!` calls.
pub(crate) fn e(s: &str) -> String {
    html_escape(s)
}

/// Wraps content in a full document.
pub(crate) fn html_page(site: &str, title: &str, nav: &str, content: &str) -> String {
    let mut html = String::with_capacity(content.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("    <title>");
    html.push_str(&html_escape(title));
    html.push_str(" - ");
    html.push_str(site);
    html.push_str("</title>\n");
    html.push_str("    <script src=\"https://unpkg.com/htmx.org@1.9.12\"></script>\n");
    html.push_str("</head>\n<body>\n    <nav>");
    html.push_str(nav);
    html.push_str("</nav>\n    <main>\n");
    html.push_str(content);
    html.push_str("\n    </main>\n</body>\n</html>");
    html
}

/// Renders rows of a two-column definition table.
pub(crate) fn details(rows: &[(&str, String)]) -> String {
    let mut html = String::from("<table class=\"details\">");
    for (label, value) in rows {
        html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>", label, e(value)));
    }
    html.push_str("</table>");
    html
}

/// A message shown when a list is empty.
pub(crate) fn empty(message: &str) -> String {
    format!("<p class=\"empty\">{}</p>", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x's")</script> & co"#),
            "&lt;script&gt;alert(&quot;x&#39;s&quot;)&lt;/script&gt; &amp; co"
        );
    }

    #[test]
    fn test_page_escapes_title() {
        let page = html_page("Rehla", "<b>", "", "body");
        assert!(page.contains("<title>&lt;b&gt; - Rehla</title>"));
        assert!(page.contains("body"));
    }
}
