use serde::{Deserialize, Deserializer, Serialize, de};

use crate::config::ConfigError;

const INVALID_FILE_EXT_CHARS: [char; 2] = ['/', '.'];

/// Language tags the sandbox can run. Every other tag is editor-only.
pub const EXECUTABLE_TAGS: [&str; 2] = ["javascript", "typescript"];

/// A language offered by the session language selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// Human-readable name for the language (e.g., "TypeScript")
    pub name: String,

    /// How source in this language is executed
    #[serde(default)]
    pub dialect: Dialect,

    /// File extensions mapped to this language
    #[serde(default)]
    pub extensions: Vec<FileExtension>,
}

impl Language {
    /// Check if the sandbox can run this language
    pub fn is_executable(&self) -> bool {
        self.dialect.is_executable()
    }

    /// Check if this language claims the given file extension
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext.as_str() == extension)
    }
}

/// Execution dialect of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Executed as-is
    JavaScript,

    /// Type annotations stripped, then executed as JavaScript
    TypeScript,

    /// Offered for editing only
    #[default]
    Unsupported,
}

impl Dialect {
    /// The only dialect a tag may carry. Fixed, whatever the configuration says.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "javascript" => Dialect::JavaScript,
            "typescript" => Dialect::TypeScript,
            _ => Dialect::Unsupported,
        }
    }

    pub fn is_executable(&self) -> bool {
        !matches!(self, Dialect::Unsupported)
    }
}

/// File extension without dot (e.g., "ts")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileExtension(String);

impl FileExtension {
    pub fn new(extension: &str) -> Result<Self, ConfigError> {
        let contains_invalid = extension
            .chars()
            .any(|c| INVALID_FILE_EXT_CHARS.contains(&c));
        if contains_invalid {
            return Err(ConfigError::InvalidFileExtChars);
        }
        Ok(Self(extension.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for FileExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FileExtension::new(&s).map_err(|_| {
            de::Error::invalid_value(
                de::Unexpected::Str(&s),
                &"a file extension without '/' or '.' characters",
            )
        })
    }
}

impl std::fmt::Display for FileExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that a language tag is non-empty and made of `[a-z0-9_+-]`
pub fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_+-".contains(c))
}
