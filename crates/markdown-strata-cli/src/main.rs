//! Renders a Markdown file (or stdin) to HTML, canonical Markdown or a tree dump.

use anyhow::{Context, Result, bail};
use clap::{Parser as ClapParser, ValueEnum};
use markdown_strata_config::Config;
use markdown_strata_engine::parsing::snapshot::normalize;
use markdown_strata_engine::{BlockType, Extension, HtmlRenderer, MarkdownRenderer, Parser};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Markdown,
    Tree,
}

#[derive(Debug, ClapParser)]
#[command(name = "markdown-strata")]
#[command(about = "Parse CommonMark with optional extensions and render the result")]
struct Args {
    /// Markdown file to read; stdin when omitted
    file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Config file to use instead of ~/.config/markdown-strata/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extension to enable, in addition to those in the config file
    #[arg(short, long = "ext", value_name = "NAME")]
    extensions: Vec<String>,

    /// Reject inputs larger than this many bytes
    #[arg(long, value_name = "N")]
    max_bytes: Option<usize>,

    /// Log parser activity at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let mut config = load_config(args.config.as_ref())?;
    config.parser.extensions.extend(args.extensions.iter().cloned());
    if args.max_bytes.is_some() {
        config.parser.max_input_bytes = args.max_bytes;
    }

    let input = read_input(args.file.as_ref(), config.parser.max_input_bytes)?;
    let output = render(&config, args.format, &input)?;

    io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}

/// An explicit `--config` path must exist; the default location is optional.
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = Config::expand_path(path);
            Config::load_from_path(&path)?
                .with_context(|| format!("Config file '{}' not found", path.display()))
        }
        None => {
            log::debug!("Config path: {}", Config::config_path().display());
            Ok(Config::load()?.unwrap_or_default())
        }
    }
}

fn read_input(file: Option<&PathBuf>, limit: Option<usize>) -> Result<String> {
    match file {
        Some(file) => std::fs::File::open(file)
            .map_err(anyhow::Error::from)
            .and_then(|reader| read_limited(reader, limit))
            .with_context(|| format!("Failed to read '{}'", file.display())),
        None => read_limited(io::stdin().lock(), limit).context("Failed to read stdin"),
    }
}

/// Reads at most one byte past `limit`, so oversized input is rejected
/// without buffering all of it.
fn read_limited(mut reader: impl Read, limit: Option<usize>) -> Result<String> {
    let mut bytes = Vec::new();
    match limit {
        Some(limit) => {
            reader
                .take((limit as u64).saturating_add(1))
                .read_to_end(&mut bytes)?;
            if bytes.len() > limit {
                bail!("Input exceeds the limit of {limit} bytes");
            }
        }
        None => {
            reader.read_to_end(&mut bytes)?;
        }
    }
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

fn render(config: &Config, format: Format, input: &str) -> Result<String> {
    let extensions = resolve_extensions(&config.parser.extensions)?;
    let parser = build_parser(config, &extensions)?;
    let doc = parser.parse(input).context("Failed to parse input")?;

    Ok(match format {
        Format::Html => build_html_renderer(config, &extensions).render(&doc),
        Format::Markdown => MarkdownRenderer::new().render(&doc),
        Format::Tree => normalize(&doc).to_string(),
    })
}

/// Looks up extensions by name, dropping repeats but keeping first-seen order.
fn resolve_extensions(names: &[String]) -> Result<Vec<Arc<dyn Extension>>> {
    let mut seen: Vec<&str> = Vec::new();
    let mut extensions = Vec::new();
    for name in names {
        if seen.contains(&name.as_str()) {
            continue;
        }
        let Some(extension) = markdown_strata_extensions::by_name(name) else {
            bail!(
                "Unknown extension '{name}' (available: {})",
                markdown_strata_extensions::NAMES.join(", ")
            );
        };
        seen.push(name);
        extensions.push(extension);
    }
    Ok(extensions)
}

fn resolve_block_types(names: &[String]) -> Result<Vec<BlockType>> {
    names
        .iter()
        .map(|name| {
            BlockType::from_name(name).with_context(|| {
                let available: Vec<_> = BlockType::ALL.iter().map(|t| t.name()).collect();
                format!("Unknown block type '{name}' (available: {})", available.join(", "))
            })
        })
        .collect()
}

fn build_parser(config: &Config, extensions: &[Arc<dyn Extension>]) -> Result<Parser> {
    let mut builder = Parser::builder();
    builder
        .max_input_bytes(config.parser.max_input_bytes)
        .max_nesting_depth(config.parser.max_nesting_depth)
        .extensions(extensions);
    if let Some(blocks) = &config.parser.enabled_blocks {
        builder.enabled_block_types(resolve_block_types(blocks)?);
    }
    Ok(builder.build()?)
}

fn build_html_renderer(config: &Config, extensions: &[Arc<dyn Extension>]) -> HtmlRenderer {
    let html = &config.html;
    HtmlRenderer::builder()
        .softbreak(html.softbreak.clone())
        .escape_html(html.escape_html)
        .sanitize_urls(html.sanitize_urls)
        .percent_encode_urls(html.percent_encode_urls)
        .extensions(extensions)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_extensions(names: &[&str]) -> Config {
        let mut config = Config::default();
        config.parser.extensions = names.iter().map(|n| n.to_string()).collect();
        config
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "markdown-strata",
            "notes.md",
            "--format",
            "tree",
            "--ext",
            "tables",
            "-e",
            "autolink",
            "--max-bytes",
            "100",
        ]);

        assert_eq!(args.file, Some(PathBuf::from("notes.md")));
        assert_eq!(args.format, Format::Tree);
        assert_eq!(args.extensions, vec!["tables", "autolink"]);
        assert_eq!(args.max_bytes, Some(100));
        assert!(!args.verbose);
    }

    #[test]
    fn test_render_html_with_extensions() {
        let config = config_with_extensions(&["strikethrough", "autolink"]);
        let output = render(&config, Format::Html, "~~old~~ www.example.com\n").unwrap();

        assert_eq!(
            output,
            "<p><del>old</del> <a href=\"http://www.example.com\">www.example.com</a></p>\n"
        );
    }

    #[test]
    fn test_render_markdown_and_tree() {
        let config = Config::default();

        assert_eq!(
            render(&config, Format::Markdown, "Hello *world*!\n").unwrap(),
            "Hello *world*\\!\n"
        );
        insta::assert_snapshot!(render(&config, Format::Tree, "> hi\n").unwrap(), @r#"
        Document
          BlockQuote
            Paragraph
              Text "hi"
        "#);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let err = render(&config_with_extensions(&["footnotes"]), Format::Html, "x").unwrap_err();
        assert!(err.to_string().contains("Unknown extension 'footnotes'"));

        let mut config = Config::default();
        config.parser.enabled_blocks = Some(vec!["headings".to_string()]);
        let err = render(&config, Format::Html, "x").unwrap_err();
        assert!(err.to_string().contains("Unknown block type 'headings'"));
    }

    #[test]
    fn test_repeated_extensions_are_registered_once() {
        let extensions = resolve_extensions(&["ins".to_string(), "ins".to_string()]).unwrap();
        assert_eq!(extensions.len(), 1);
    }

    #[test]
    fn test_enabled_blocks_restrict_parsing() {
        let mut config = Config::default();
        config.parser.enabled_blocks = Some(vec!["list".to_string()]);

        let output = render(&config, Format::Html, "# not a heading\n- item\n").unwrap();
        assert_eq!(output, "<p># not a heading</p>\n<ul>\n<li>item</li>\n</ul>\n");
    }

    #[test]
    fn test_input_limit_is_reported() {
        let mut config = Config::default();
        config.parser.max_input_bytes = Some(4);

        let err = render(&config, Format::Html, "too long\n").unwrap_err();
        assert!(format!("{err:#}").contains("exceeds the limit of 4 bytes"));
    }

    #[test]
    fn test_config_file_options_apply() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[parser]\nextensions = [\"ins\"]\n\n[html]\nsoftbreak = \"<br />\\n\"\n",
        )
        .unwrap();

        let config = load_config(Some(&config_file)).unwrap();
        let output = render(&config, Format::Html, "++a++\nb\n").unwrap();

        assert_eq!(output, "<p><ins>a</ins><br />\nb</p>\n");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");

        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_read_input_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("doc.md");
        std::fs::write(&file, "# Title\n").unwrap();

        assert_eq!(read_input(Some(&file), None).unwrap(), "# Title\n");
        assert_eq!(read_input(Some(&file), Some(8)).unwrap(), "# Title\n");

        let err = read_input(Some(&file), Some(7)).unwrap_err();
        assert!(format!("{err:#}").contains("exceeds the limit of 7 bytes"));
    }

    #[test]
    fn test_endless_input_stops_at_the_limit() {
        let err = read_limited(io::repeat(b'a'), Some(1024)).unwrap_err();
        assert!(err.to_string().contains("exceeds the limit of 1024 bytes"));

        let err = read_limited(&[0xff, 0xfe][..], None).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
