//! Run configuration and link rules.

use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::{Builder, UninitializedFieldError};
use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// A rule describing which basenames are linked and where.
///
/// The pattern always has to match the whole basename, never a substring.
#[derive(Debug, Clone)]
pub struct LinkMap {
    pattern: String,
    regex: Regex,
    target: PathBuf,
    prefix: Option<PathBuf>,
}

impl LinkMap {
    /// Compile a new rule.
    pub fn new(pattern: &str, target: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::Invalid {
                message: "Link map regex cannot be empty".to_string(),
            });
        }
        let target = target.into();
        if target.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: format!("Link map target for {pattern:?} cannot be empty"),
            });
        }

        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            ConfigError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            target,
            prefix: None,
        })
    }

    /// Use `prefix` joined with the basename as the link source instead of
    /// the matched node's own path.
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Pattern as written in the configuration.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Directory links are created in.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Optional source prefix.
    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_deref()
    }

    /// Check if `basename` matches this rule. Blank names never match.
    pub fn is_match(&self, basename: &str) -> bool {
        !basename.trim().is_empty() && self.regex.is_match(basename)
    }
}

impl PartialEq for LinkMap {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.target == other.target && self.prefix == other.prefix
    }
}

impl Eq for LinkMap {}

/// Validated configuration for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate", error = "ConfigError"))]
pub struct Configuration {
    /// Directory whose contents are linked.
    pub source: PathBuf,

    /// Directories that are scanned for existing links.
    pub targets: Vec<PathBuf>,

    /// Basenames to skip, compared case-insensitively.
    #[builder(default)]
    pub excludes: Vec<String>,

    /// Link rules in declaration order.
    #[builder(default)]
    pub link_maps: Vec<LinkMap>,
}

impl From<UninitializedFieldError> for ConfigError {
    fn from(err: UninitializedFieldError) -> Self {
        match err.field_name() {
            "source" => Self::MissingSource,
            "targets" => Self::MissingTargets,
            field => Self::Invalid {
                message: format!("`{field}` must be initialized"),
            },
        }
    }
}

impl ConfigurationBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref source) = self.source {
            if source.as_os_str().is_empty() {
                return Err(ConfigError::MissingSource);
            }
        }
        if let Some(ref targets) = self.targets {
            if targets.is_empty() || targets.iter().any(|t| t.as_os_str().is_empty()) {
                return Err(ConfigError::MissingTargets);
            }
        }
        Ok(())
    }
}

/// On-disk representation, validated into [`Configuration`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationFile {
    #[serde(default)]
    source: String,
    #[serde(default)]
    targets: Vec<String>,
    #[serde(default)]
    excludes: Vec<String>,
    #[serde(default)]
    link_maps: Vec<LinkMapEntry>,
}

#[derive(Debug, Deserialize)]
struct LinkMapEntry {
    #[serde(default)]
    regex: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    prefix: Option<String>,
}

impl Configuration {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Read and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json(&data)
    }

    /// Parse and validate a configuration from JSON text.
    ///
    /// `//` and `/* */` comments are accepted outside of strings.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let data = strip_comments(data);
        let file: ConfigurationFile =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse { source })?;

        let link_maps = file
            .link_maps
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_link_map(index))
            .collect::<Result<Vec<_>, _>>()?;

        Self::builder()
            .source(file.source)
            .targets(file.targets.into_iter().map(PathBuf::from).collect::<Vec<_>>())
            .excludes(
                file.excludes
                    .iter()
                    .map(|e| e.to_lowercase())
                    .collect::<Vec<_>>(),
            )
            .link_maps(link_maps)
            .build()
    }
}

impl LinkMapEntry {
    fn into_link_map(self, index: usize) -> Result<LinkMap, ConfigError> {
        if self.regex.is_empty() {
            return Err(ConfigError::InvalidLinkMap {
                index,
                message: "missing regex".to_string(),
            });
        }
        if self.target.is_empty() {
            return Err(ConfigError::InvalidLinkMap {
                index,
                message: "missing target".to_string(),
            });
        }

        let link_map = LinkMap::new(&self.regex, self.target)?;
        Ok(match self.prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => link_map.with_prefix(prefix),
            None => link_map,
        })
    }
}

/// Blank out comments, keeping line and column positions for parse errors.
fn strip_comments(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut chars = data.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    out.push(' ');
                }
                out.push(' ');
            }
            ('/', Some('*')) => {
                chars.next();
                out.push_str("  ");
                let mut previous = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}
