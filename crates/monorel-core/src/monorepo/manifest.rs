//! Manifest formats and documents
//!
//! A manifest is a JSON object (`package.json`, `composer.json`). Documents
//! remember their indentation and line-ending style so that rewriting one
//! only changes field values, never formatting.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ManifestError, Result};

/// How a format's package names map into the shared namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEncoding {
    /// Names are used as-is
    Identity,
    /// Names are prefixed with a sigil to keep them apart from other formats
    Sigil(char),
}

impl NameEncoding {
    /// Map a name declared in this format into the shared namespace
    pub fn encode(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_string(),
            Self::Sigil(sigil) => format!("{}{}", sigil, name),
        }
    }

    /// Map a shared-namespace name back into this format's own spelling
    pub fn decode<'a>(&self, name: &'a str) -> &'a str {
        match self {
            Self::Identity => name,
            Self::Sigil(sigil) => name.strip_prefix(*sigil).unwrap_or(name),
        }
    }
}

/// A supported manifest format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFormat {
    /// File name looked up in each package directory
    pub file_name: &'static str,
    /// Keys holding dependency maps
    pub dependency_keys: &'static [&'static str],
    /// Name encoding into the shared namespace
    pub encoding: NameEncoding,
    /// Whether `repositories[*].options.versions` pins workspace versions
    pub pins_repository_versions: bool,
}

impl ManifestFormat {
    /// npm `package.json`
    pub const PACKAGE_JSON: Self = Self {
        file_name: "package.json",
        dependency_keys: &[
            "dependencies",
            "devDependencies",
            "peerDependencies",
            "optionalDependencies",
        ],
        encoding: NameEncoding::Identity,
        pins_repository_versions: false,
    };

    /// Composer `composer.json`
    pub const COMPOSER_JSON: Self = Self {
        file_name: "composer.json",
        dependency_keys: &["require", "require-dev"],
        encoding: NameEncoding::Sigil('@'),
        pins_repository_versions: true,
    };

    /// Encode a name declared in this format
    pub fn encode(&self, name: &str) -> String {
        self.encoding.encode(name)
    }

    /// Decode a shared-namespace name into this format
    pub fn decode<'a>(&self, name: &'a str) -> &'a str {
        self.encoding.decode(name)
    }
}

/// The fixed, ordered table of supported formats.
///
/// Lookup order is priority order: when manifests at one location disagree
/// on a name, later formats are processed last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFormats {
    formats: Vec<ManifestFormat>,
}

impl ManifestFormats {
    /// Create a table from an explicit list of formats
    pub fn new(formats: Vec<ManifestFormat>) -> Self {
        Self { formats }
    }

    /// `package.json` followed by `composer.json`
    pub fn standard() -> Self {
        Self::new(vec![ManifestFormat::PACKAGE_JSON, ManifestFormat::COMPOSER_JSON])
    }

    /// Get a format by file name
    pub fn get(&self, file_name: &str) -> Option<&ManifestFormat> {
        self.formats.iter().find(|f| f.file_name == file_name)
    }

    /// Iterate formats in priority order
    pub fn iter(&self) -> impl Iterator<Item = &ManifestFormat> {
        self.formats.iter()
    }

    /// Whether any supported manifest exists in `dir`
    pub fn any_exists(&self, dir: &Path) -> bool {
        self.formats.iter().any(|f| dir.join(f.file_name).is_file())
    }
}

impl Default for ManifestFormats {
    fn default() -> Self {
        Self::standard()
    }
}

/// Indentation style of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Indent {
    /// Single-line document
    #[default]
    None,
    /// N spaces per level
    Spaces(usize),
    /// N tabs per level
    Tabs(usize),
}

impl Indent {
    /// Number of indentation characters per level
    pub fn width(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Spaces(n) | Self::Tabs(n) => *n,
        }
    }

    fn unit(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Spaces(n) => " ".repeat(*n),
            Self::Tabs(n) => "\t".repeat(*n),
        }
    }
}

/// Line-ending style of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newline {
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Detect the indentation step used by `content`.
///
/// The step is the most frequent change in leading whitespace between
/// consecutive non-blank lines; ties go to the narrower step.
pub fn detect_indent(content: &str) -> Indent {
    let mut steps: HashMap<(bool, usize), usize> = HashMap::new();
    let mut previous = 0;
    let mut previous_tabs = false;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let leading: &str = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        let width = leading.len();
        let tabs = leading.starts_with('\t');
        let step = width.abs_diff(previous);
        // the deeper of the two lines decides the indent character
        let step_tabs = if width > previous { tabs } else { previous_tabs };
        previous = width;
        previous_tabs = tabs;
        if step > 0 {
            *steps.entry((step_tabs, step)).or_default() += 1;
        }
    }

    steps
        .into_iter()
        .max_by_key(|((tabs, step), count)| (*count, std::cmp::Reverse(*step), !*tabs))
        .map(|((tabs, step), _)| if tabs { Indent::Tabs(step) } else { Indent::Spaces(step) })
        .unwrap_or_default()
}

/// Detect the dominant line ending; `None` when the content has no line breaks
pub fn detect_newline(content: &str) -> Option<Newline> {
    let crlf = content.matches("\r\n").count();
    let lf = content.matches('\n').count() - crlf;

    match (crlf, lf) {
        (0, 0) => None,
        (crlf, lf) if crlf > lf => Some(Newline::CrLf),
        _ => Some(Newline::Lf),
    }
}

/// A parsed manifest with its formatting metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    /// Parsed key-value content, in file order
    pub content: Map<String, Value>,
    /// Detected indentation
    pub indent: Indent,
    /// Detected line ending
    pub newline: Option<Newline>,
}

impl ManifestDocument {
    /// Wrap already-parsed content with explicit formatting
    pub fn new(content: Map<String, Value>, indent: Indent, newline: Option<Newline>) -> Self {
        Self {
            content,
            indent,
            newline,
        }
    }

    /// Parse manifest text; `path` is used for error reporting
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| ManifestError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(content) = value else {
            return Err(ManifestError::NotAnObject(path.to_path_buf()).into());
        };

        Ok(Self {
            content,
            indent: detect_indent(text),
            newline: detect_newline(text),
        })
    }

    /// Declared package name
    pub fn name(&self) -> Option<&str> {
        self.content.get("name").and_then(Value::as_str)
    }

    /// Declared package version
    pub fn version(&self) -> Option<&str> {
        self.content.get("version").and_then(Value::as_str)
    }

    /// Dependency names declared under `key`, in declaration order
    pub fn dependency_names(&self, key: &str) -> Vec<&str> {
        self.content
            .get(key)
            .and_then(Value::as_object)
            .map(|deps| deps.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Render back to text using the document's own formatting.
    ///
    /// Unindented documents render compact. A trailing line ending is always
    /// written, LF when the parsed text had none.
    pub fn render(&self) -> Result<String> {
        let json = match self.indent {
            Indent::None => serde_json::to_string(&self.content)
                .map_err(|e| ManifestError::SerializeFailed(e.to_string()))?,
            indent => {
                let unit = indent.unit();
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(unit.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                self.content
                    .serialize(&mut serializer)
                    .map_err(|e| ManifestError::SerializeFailed(e.to_string()))?;
                String::from_utf8(buf).map_err(|e| ManifestError::SerializeFailed(e.to_string()))?
            }
        };

        Ok(match self.newline {
            Some(Newline::CrLf) => format!("{}\r\n", json.replace('\n', "\r\n")),
            _ => format!("{}\n", json),
        })
    }
}
