/// Options shared by every HTML page the service serves.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub title: String,
    /// Auto-refresh interval in seconds; 0 disables the refresh tag.
    pub refresh_secs: u64,
}

impl PageShell {
    pub fn new(title: impl Into<String>, refresh_secs: u64) -> Self {
        Self {
            title: title.into(),
            refresh_secs,
        }
    }

    /// Wrap `body` (already HTML) into a complete document.
    pub fn wrap(&self, body: &str) -> String {
        let refresh = if self.refresh_secs > 0 {
            format!(
                "<meta http-equiv=\"refresh\" content=\"{}\" />",
                self.refresh_secs
            )
        } else {
            String::new()
        };

        format!(
            "<html><head><meta charset=\"utf-8\">{refresh}\
             <style>body {{ color: #F7931A; background: #000000; font-family: Courier, monospace; }} \
             a {{ color: #F7931A; }} m {{ color: #A9A9A9; }} g {{ color: #999999; }}</style>\
             <title>{title}</title></head><body>{body}</body></html>",
            title = escape(&self.title),
        )
    }
}

/// Escape plain text for inclusion in HTML.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_body_with_title_and_refresh() {
        let page = PageShell::new("Agent", 25).wrap("<br>hello");
        assert!(page.starts_with("<html>"));
        assert!(page.ends_with("</html>"));
        assert!(page.contains("<title>Agent</title>"));
        assert!(page.contains("content=\"25\""));
        assert!(page.contains("<body><br>hello</body>"));
    }

    #[test]
    fn test_zero_refresh_omits_tag() {
        let page = PageShell::new("Agent", 0).wrap("");
        assert!(!page.contains("http-equiv"));
    }

    #[test]
    fn test_title_is_escaped() {
        let page = PageShell::new("<b>Bot</b>", 0).wrap("");
        assert!(page.contains("<title>&lt;b&gt;Bot&lt;/b&gt;</title>"));
    }
}
