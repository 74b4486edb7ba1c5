use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The flavor of Markdown to parse.
/// Each flavor has a different set of default extensions enabled.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    /// CommonMark only
    CommonMark,
    /// GitHub Flavored Markdown: tables, task lists, strikethrough
    Gfm,
    /// GFM plus documentation tags (`@param`, `{@link ...}`)
    #[default]
    TsDoc,
}

/// Syntax extensions on top of CommonMark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    /// GFM pipe tables
    pub tables: bool,
    /// `- [ ]` and `- [x]` list items
    pub task_lists: bool,
    /// `~~text~~`
    pub strikethrough: bool,
    /// `<https://example.com>` and `<me@example.com>`
    pub autolinks: bool,
    /// Inline HTML tags and HTML blocks
    pub raw_html: bool,
    /// `@tag` blocks and modifiers, `{@tag ...}` inline tags
    pub doc_tags: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self::for_flavor(Flavor::default())
    }
}

impl Extensions {
    /// Get the default extension set for a given flavor.
    pub fn for_flavor(flavor: Flavor) -> Self {
        match flavor {
            Flavor::CommonMark => Self::commonmark_defaults(),
            Flavor::Gfm => Self::gfm_defaults(),
            Flavor::TsDoc => Self::tsdoc_defaults(),
        }
    }

    fn commonmark_defaults() -> Self {
        Self {
            tables: false,
            task_lists: false,
            strikethrough: false,
            autolinks: true,
            raw_html: true,
            doc_tags: false,
        }
    }

    fn gfm_defaults() -> Self {
        Self {
            tables: true,
            task_lists: true,
            strikethrough: true,
            ..Self::commonmark_defaults()
        }
    }

    fn tsdoc_defaults() -> Self {
        Self {
            doc_tags: true,
            ..Self::gfm_defaults()
        }
    }
}

/// How a documentation tag is written.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TagSyntax {
    /// Starts a section: `@remarks`, `@param name - ...`
    Block,
    /// Stands alone and flags the item: `@beta`, `@sealed`
    Modifier,
    /// Appears in braces inside text: `{@link Foo | text}`
    Inline,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TagDefinition {
    /// Tag name including the leading `@`.
    pub name: String,
    pub syntax: TagSyntax,
    /// Block tags followed by a parameter name and a hyphen (`@param`, `@typeParam`).
    #[serde(default)]
    pub parameter: bool,
    /// Inline tags of the form `{@tag destination | text}`.
    #[serde(default)]
    pub link: bool,
}

impl TagDefinition {
    pub fn new(name: impl Into<String>, syntax: TagSyntax) -> Self {
        Self {
            name: name.into(),
            syntax,
            parameter: false,
            link: false,
        }
    }

    pub fn with_parameter(mut self) -> Self {
        self.parameter = true;
        self
    }

    pub fn link_like(mut self) -> Self {
        self.link = true;
        self
    }
}

/// The set of documentation tags the parser recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfiguration {
    pub definitions: Vec<TagDefinition>,
    /// Report `tsdoc-undefined-tag` for well-formed tags with no definition.
    pub report_undefined: bool,
}

impl Default for TagConfiguration {
    fn default() -> Self {
        Self::standard()
    }
}

impl TagConfiguration {
    /// The standard TSDoc tags.
    pub fn standard() -> Self {
        use TagSyntax::*;

        let mut definitions = Vec::new();
        for name in [
            "@remarks",
            "@privateRemarks",
            "@example",
            "@returns",
            "@throws",
            "@deprecated",
            "@see",
            "@defaultValue",
            "@decorator",
        ] {
            definitions.push(TagDefinition::new(name, Block));
        }
        definitions.push(TagDefinition::new("@param", Block).with_parameter());
        definitions.push(TagDefinition::new("@typeParam", Block).with_parameter());
        for name in [
            "@alpha",
            "@beta",
            "@eventProperty",
            "@experimental",
            "@internal",
            "@override",
            "@packageDocumentation",
            "@public",
            "@readonly",
            "@sealed",
            "@virtual",
        ] {
            definitions.push(TagDefinition::new(name, Modifier));
        }
        definitions.push(TagDefinition::new("@link", Inline).link_like());
        definitions.push(TagDefinition::new("@inheritDoc", Inline));
        definitions.push(TagDefinition::new("@label", Inline));

        Self {
            definitions,
            report_undefined: true,
        }
    }

    /// Look up a tag by name. Tag names match case-insensitively.
    pub fn find(&self, name: &str) -> Option<&TagDefinition> {
        self.definitions
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
    }

    /// Add a definition, replacing any existing one with the same name.
    pub fn define(&mut self, definition: TagDefinition) {
        self.definitions
            .retain(|def| !def.name.eq_ignore_ascii_case(&definition.name));
        self.definitions.push(definition);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub flavor: Flavor,
    pub extensions: Extensions,
    pub tags: TagConfiguration,
}

impl Default for Config {
    fn default() -> Self {
        let flavor = Flavor::default();
        Self {
            flavor,
            extensions: Extensions::for_flavor(flavor),
            tags: TagConfiguration::default(),
        }
    }
}

impl Config {
    pub fn for_flavor(flavor: Flavor) -> Self {
        Self {
            flavor,
            extensions: Extensions::for_flavor(flavor),
            tags: TagConfiguration::default(),
        }
    }
}

/// On-disk shape of the config file. Extension switches left out fall back
/// to the defaults of the chosen flavor.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ConfigFile {
    flavor: Flavor,
    extensions: ExtensionOverrides,
    tags: TagsFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct ExtensionOverrides {
    tables: Option<bool>,
    task_lists: Option<bool>,
    strikethrough: Option<bool>,
    autolinks: Option<bool>,
    raw_html: Option<bool>,
    doc_tags: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct TagsFile {
    /// Start from the standard TSDoc tags before adding `define`.
    standard: bool,
    report_undefined: bool,
    define: Vec<TagDefinition>,
}

impl Default for TagsFile {
    fn default() -> Self {
        Self {
            standard: true,
            report_undefined: true,
            define: Vec::new(),
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let mut extensions = Extensions::for_flavor(file.flavor);
        let overrides = file.extensions;
        let switches = [
            (&mut extensions.tables, overrides.tables),
            (&mut extensions.task_lists, overrides.task_lists),
            (&mut extensions.strikethrough, overrides.strikethrough),
            (&mut extensions.autolinks, overrides.autolinks),
            (&mut extensions.raw_html, overrides.raw_html),
            (&mut extensions.doc_tags, overrides.doc_tags),
        ];
        for (switch, value) in switches {
            if let Some(value) = value {
                *switch = value;
            }
        }

        let mut tags = if file.tags.standard {
            TagConfiguration::standard()
        } else {
            TagConfiguration {
                definitions: Vec::new(),
                report_undefined: true,
            }
        };
        tags.report_undefined = file.tags.report_undefined;
        for definition in file.tags.define {
            tags.define(definition);
        }

        Self {
            flavor: file.flavor,
            extensions,
            tags,
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Switch flavor, resetting extensions to that flavor's defaults.
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.config.flavor = flavor;
        self.config.extensions = Extensions::for_flavor(flavor);
        self
    }

    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.config.extensions = extensions;
        self
    }

    pub fn tags(mut self, tags: TagConfiguration) -> Self {
        self.config.tags = tags;
        self
    }

    pub fn define_tag(mut self, definition: TagDefinition) -> Self {
        self.config.tags.define(definition);
        self
    }

    pub fn report_undefined_tags(mut self, report: bool) -> Self {
        self.config.tags.report_undefined = report;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".docmark.toml", "docmark.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<ConfigFile>(s)
        .map(Config::from)
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid config {}: {e}", path.display()),
            )
        })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("docmark").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(home) = env::var("HOME") {
        let p = Path::new(&home)
            .join(".config")
            .join("docmark")
            .join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .docmark.toml, docmark.toml
/// 3) XDG: $XDG_CONFIG_HOME/docmark/config.toml or ~/.config/docmark/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir)
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    if let Some(p) = xdg_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
