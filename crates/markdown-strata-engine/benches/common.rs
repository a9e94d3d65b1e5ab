// Shared by every bench target in this directory; each one only uses some of it.
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* **content** and `code`.\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted [link][ref] text\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n[ref]: https://example.com \"Example\"\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_emphasis_heavy(size: usize) -> String {
    "*a **b _c __d__ e_ f** g* ***h*** i_j_k **l*m**n\n".repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_quotes(depth: usize) -> String {
    let mut content = String::new();
    for level in 1..=depth {
        content.push_str(&"> ".repeat(level));
        content.push_str("line\n");
    }
    content
}
