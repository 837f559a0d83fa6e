//! Markdown rendering for `.md` documents.

use comrak::{Options, markdown_to_html};

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Raw HTML in the document is passed through; the CSP set by
/// [`crate::middleware::security_headers`] keeps it from running scripts.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        let html = render_markdown("# Hi");
        assert!(html.contains("<h1>Hi</h1>"), "got {html}");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render_markdown("<h1>Ruby is...</h1>");
        assert!(html.contains("<h1>Ruby is...</h1>"));
    }

    #[test]
    fn test_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_strikethrough() {
        assert!(render_markdown("~~gone~~").contains("<del>gone</del>"));
    }
}
