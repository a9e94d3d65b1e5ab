//! Raw HTML patterns shared by HTML blocks and inline HTML.

pub const TAG_NAME: &str = "[A-Za-z][A-Za-z0-9-]*";
pub const ATTRIBUTE_NAME: &str = "[a-zA-Z_:][a-zA-Z0-9_.:-]*";
const UNQUOTED_VALUE: &str = "[^\"'=<>`\\x00-\\x20]+";
const SINGLE_QUOTED_VALUE: &str = "'[^']*'";
const DOUBLE_QUOTED_VALUE: &str = "\"[^\"]*\"";

fn attribute_value() -> String {
    format!("(?:{UNQUOTED_VALUE}|{SINGLE_QUOTED_VALUE}|{DOUBLE_QUOTED_VALUE})")
}

fn attribute() -> String {
    format!(
        "(?:\\s+{ATTRIBUTE_NAME}(?:\\s*=\\s*{})?)",
        attribute_value()
    )
}

/// `<tag attr="x">` or `<tag/>`.
pub fn open_tag() -> String {
    format!("<{TAG_NAME}{}*\\s*/?>", attribute())
}

/// `</tag>`.
pub fn close_tag() -> String {
    format!("</{TAG_NAME}\\s*[>]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn anchored(pattern: &str) -> Regex {
        Regex::new(&format!("^(?:{pattern})$")).unwrap()
    }

    #[test]
    fn open_tags() {
        let re = anchored(&open_tag());
        assert!(re.is_match("<a>"));
        assert!(re.is_match("<bab>"));
        assert!(re.is_match("<c2c>"));
        assert!(re.is_match("<a/>"));
        assert!(re.is_match("<b2/>"));
        assert!(re.is_match("<b2\ndata=\"foo\" >"));
        assert!(!re.is_match("<33>"));
        assert!(!re.is_match("<__>"));
        assert!(!re.is_match("<a h*#ref=\"hi\">"));
        assert!(!re.is_match("<a href='bar'title=title>"));
    }

    #[test]
    fn close_tags() {
        let re = anchored(&close_tag());
        assert!(re.is_match("</a>"));
        assert!(re.is_match("</foo >"));
        assert!(!re.is_match("</a href=\"foo\">"));
    }
}
