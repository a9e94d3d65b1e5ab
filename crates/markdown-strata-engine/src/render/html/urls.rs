use std::fmt::Write;

/// Characters left alone when percent-encoding a destination.
const SAFE: &[u8] = b";/?:@&=+$,-_.!~*'()#";

/// Percent-encodes everything outside the URL-safe set. Existing `%XX`
/// escapes are kept as they are.
pub fn percent_encode(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
        {
            out.push_str(&url[i..i + 3]);
            i += 3;
            continue;
        }
        if b.is_ascii_alphanumeric() || SAFE.contains(&b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
        i += 1;
    }
    out
}

/// Drops destinations whose scheme could run script. Relative URLs and
/// `http`, `https`, `mailto` and `data` pass.
pub fn sanitize(url: &str) -> &str {
    let trimmed = url.trim_start();
    let Some(colon) = trimmed.find(':') else {
        return url;
    };
    let scheme = &trimmed[..colon];
    // a colon after a path or query separator is not a scheme
    if scheme.contains(['/', '?', '#']) {
        return url;
    }
    match scheme.to_ascii_lowercase().as_str() {
        "http" | "https" | "mailto" | "data" => url,
        _ => "",
    }
}
