pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod html;
pub mod parser;
pub mod syntax;
mod utils;

pub use config::Config;
pub use config::ConfigBuilder;
pub use error::RenderError;
pub use formatter::format_document;
pub use syntax::Document;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses a document string into an editable syntax tree.
///
/// Parsing never fails: problems with the input, such as a malformed
/// documentation tag, are reported through [`Document::diagnostics`].
///
/// # Examples
///
/// ```rust
/// use docmark::parse;
///
/// let input = "Summary with a {@link Widget | link}.\n\n@remarks\nMore text.";
/// let doc = parse(input, None);
/// println!("{}", doc.debug_tree(doc.root()));
/// ```
///
/// # Arguments
///
/// * `input` - The document content to parse
/// * `config` - Optional configuration (defaults to the TSDoc flavor)
pub fn parse(input: &str, config: Option<Config>) -> Document {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let config = config.unwrap_or_default();
    parser::parse(input, &config)
}

/// Parses and renders a document string as HTML.
pub fn to_html(input: &str, config: Option<Config>) -> Result<String, RenderError> {
    html::render(&parse(input, config))
}
