use std::borrow::Cow;

use super::Attributes;

/// Output buffer that knows whether it sits at the start of a line.
#[derive(Debug, Default)]
pub struct HtmlWriter {
    buf: String,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Escaped text content.
    pub fn text(&mut self, s: &str) {
        self.buf.push_str(&escape(s));
    }

    pub fn tag(&mut self, name: &str, attributes: &Attributes) {
        self.open_tag(name, attributes);
        self.buf.push('>');
    }

    /// `<name ... />`
    pub fn void_tag(&mut self, name: &str, attributes: &Attributes) {
        self.open_tag(name, attributes);
        self.buf.push_str(" />");
    }

    pub fn close_tag(&mut self, name: &str) {
        self.buf.push_str("</");
        self.buf.push_str(name);
        self.buf.push('>');
    }

    /// Starts a new line unless already at the start of one.
    pub fn line(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn open_tag(&mut self, name: &str, attributes: &Attributes) {
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attributes {
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
    }
}

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape(s: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_and_lines() {
        let mut w = HtmlWriter::new();
        w.line();
        w.tag("a", &vec![("href".into(), "/x?a=1&b=\"2\"".into())]);
        w.text("<b>");
        w.close_tag("a");
        w.line();
        w.line();
        w.void_tag("hr", &Vec::new());
        assert_eq!(
            w.into_string(),
            "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;</a>\n<hr />"
        );
    }
}
