//! Decorator table configuration
//!
//! The decorator registry is data, not code: each entry names a pattern, a
//! breakable flag and the tag to attach. Tables are read from TOML (the
//! format users edit) or JSON, sanitized, and compiled into a
//! [`DecoratorRegistry`].

use crate::decorations::{
    DecorationTag, Decorator, DecoratorRegistry, LiteralPattern, PatternMatch, RegexPattern,
};
use crate::error::{Error, Result, ResultExt};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in decorators for markdown, in priority order.
pub const MARKDOWN_DECORATORS: &str = r#"
[[decorator]]
name = "heading"
pattern = '(?m)^#{1,6}[ \t][^\n]*'

[[decorator]]
name = "code"
pattern = '`[^`\n]+`'

[[decorator]]
name = "image"
pattern = '!\[([^\]\n]*)\]\(([^)\s]+)\)'
payload_group = 2

[[decorator]]
name = "link"
pattern = '\[[^\]\n]+\]\(([^)\s]+)\)'
not_after = "!["
payload_group = 1

[[decorator]]
name = "reference"
pattern = '\[\[([^\]\n]+)\]\]'
payload_group = 1

[[decorator]]
name = "bold"
pattern = '\*\*[^*\n]+\*\*'
breakable = true

[[decorator]]
name = "italic"
pattern = '_[^_\n]+_'
breakable = true

[[decorator]]
name = "strikethrough"
pattern = '~~[^~\n]+~~'
breakable = true
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Decorator Spec
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of the decorator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorSpec {
    /// Unique name, used in logs
    pub name: String,
    /// Regular expression to match
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pattern: String,
    /// Plain text to match instead of `pattern`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    /// Whether matches may be split around conflicting decorations
    pub breakable: bool,
    /// Tag kind to emit; defaults to `name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Decorate only this capture group of each match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_group: Option<usize>,
    /// Skip regex matches that directly follow any of these chars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
    /// Capture group whose text becomes the tag payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_group: Option<usize>,
    /// Match case exactly
    pub case_sensitive: bool,
    /// Only match whole words
    pub whole_word: bool,
    /// Disabled entries are kept in the file but not compiled
    pub enabled: bool,
}

impl Default for DecoratorSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            pattern: String::new(),
            literal: None,
            breakable: false,
            tag: None,
            capture_group: None,
            not_after: None,
            payload_group: None,
            case_sensitive: true,
            whole_word: false,
            enabled: true,
        }
    }
}

impl DecoratorSpec {
    /// A regex entry.
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>, breakable: bool) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            breakable,
            ..Self::default()
        }
    }

    /// A literal entry.
    pub fn literal(name: impl Into<String>, text: impl Into<String>, breakable: bool) -> Self {
        Self {
            name: name.into(),
            literal: Some(text.into()),
            breakable,
            ..Self::default()
        }
    }

    /// The tag kind this entry emits.
    pub fn tag_kind(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.name)
    }

    /// Whether the entry has anything to match.
    pub fn has_pattern(&self) -> bool {
        match &self.literal {
            Some(text) => !text.is_empty(),
            None => !self.pattern.is_empty(),
        }
    }

    /// Compile this entry into a decorator.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if the regex does not compile.
    pub fn compile(&self) -> Result<Decorator<DecorationTag>> {
        let kind = self.tag_kind().to_string();
        let payload_group = self.payload_group;
        let tag_factory = move |m: &PatternMatch<'_>| {
            let tag = DecorationTag::new(kind.clone());
            match payload_group.and_then(|g| m.group(g)) {
                Some(payload) => tag.with_payload(payload),
                None => tag,
            }
        };

        if let Some(text) = &self.literal {
            let pattern = LiteralPattern::new(text.as_str())
                .case_sensitive(self.case_sensitive)
                .whole_word(self.whole_word);
            return Ok(Decorator::new(&self.name, pattern, self.breakable, tag_factory));
        }

        let mut source = self.pattern.clone();
        if self.whole_word {
            source = format!(r"\b(?:{})\b", source);
        }
        if !self.case_sensitive {
            source = format!("(?i){}", source);
        }
        let mut pattern = RegexPattern::new(&source).map_err(|e| Error::InvalidPattern {
            decorator: self.name.clone(),
            source: e,
        })?;
        if let Some(group) = self.capture_group {
            pattern = pattern.with_capture_group(group);
        }
        if let Some(chars) = &self.not_after {
            pattern = pattern.not_after(chars.chars());
        }
        Ok(Decorator::new(&self.name, pattern, self.breakable, tag_factory))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decorator Table
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered decorator table. Earlier entries win conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorTable {
    /// Entries in priority order
    #[serde(rename = "decorator")]
    pub decorators: Vec<DecoratorSpec>,
}

impl DecoratorTable {
    /// The built-in markdown table.
    pub fn markdown() -> Self {
        Self::from_toml(MARKDOWN_DECORATORS)
            .unwrap_or_warn_default(Self::default(), "Built-in decorator table is invalid")
    }

    /// Parse and sanitize a TOML table.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut table: Self = toml::from_str(text)?;
        table.sanitize();
        Ok(table)
    }

    /// Parse and sanitize a JSON table.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut table: Self = serde_json::from_str(text)?;
        table.sanitize();
        Ok(table)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&DecoratorSpec> {
        self.decorators.iter().find(|d| d.name == name)
    }

    /// Drop entries that cannot work and normalize the rest.
    ///
    /// Entries without a name or pattern are removed, as are later entries
    /// reusing an earlier name. A zero `capture_group` means the whole match.
    pub fn sanitize(&mut self) {
        let mut seen = HashSet::new();
        self.decorators.retain_mut(|spec| {
            spec.name = spec.name.trim().to_string();
            if spec.name.is_empty() {
                warn!("Ignoring decorator without a name");
                return false;
            }
            if !spec.has_pattern() {
                warn!("Ignoring decorator '{}': no pattern", spec.name);
                return false;
            }
            if !seen.insert(spec.name.clone()) {
                warn!("Ignoring duplicate decorator '{}'", spec.name);
                return false;
            }
            if spec.capture_group == Some(0) {
                spec.capture_group = None;
            }
            true
        });
    }

    /// Compile every enabled entry, failing on the first invalid pattern.
    pub fn compile(&self) -> Result<DecoratorRegistry<DecorationTag>> {
        self.enabled().map(DecoratorSpec::compile).collect()
    }

    /// Compile every enabled entry, skipping invalid ones with a warning.
    pub fn compile_lenient(&self) -> DecoratorRegistry<DecorationTag> {
        self.enabled()
            .filter_map(|spec| match spec.compile() {
                Ok(decorator) => Some(decorator),
                Err(e) => {
                    warn!("{}. Skipping.", e);
                    None
                }
            })
            .collect()
    }

    fn enabled(&self) -> impl Iterator<Item = &DecoratorSpec> {
        self.decorators.iter().filter(|spec| spec.enabled)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
