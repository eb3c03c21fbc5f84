//! Language registry
//!
//! Maps a language tag to the interpreter that runs its snippets. The
//! registry starts from built-in defaults, is merged once with the build's
//! overrides, and is read-only afterwards: there is no way to mutate a
//! `LanguageRegistry` other than building a new one.

use crate::encoding;
use crate::errors::{Result, RunRecordError};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Language used when a snippet names none
pub const DEFAULT_LANGUAGE: &str = "console";

/// Encoding used when a language names none
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Feeds stdin to a Python console line by line without printing prompts,
/// so only what the statements write reaches the output. A trailing open
/// block is closed with an empty line.
pub const PYCON_CONSOLE: &str = "import code,sys;c=code.InteractiveConsole();\
m=[c.push(l) for l in sys.stdin.read().split('\\n')];m and m[-1] and c.push('')";

/// How to run snippets of one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    tag: String,
    command: Vec<String>,
    input_encoding: String,
    output_encoding: String,
    prompt_prefix: String,
}

impl LanguageEntry {
    pub fn new(tag: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            command,
            input_encoding: DEFAULT_ENCODING.to_string(),
            output_encoding: DEFAULT_ENCODING.to_string(),
            prompt_prefix: String::new(),
        }
    }

    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = prefix.into();
        self
    }

    pub fn with_input_encoding(mut self, label: impl Into<String>) -> Self {
        self.input_encoding = label.into();
        self
    }

    pub fn with_output_encoding(mut self, label: impl Into<String>) -> Self {
        self.output_encoding = label.into();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Interpreter argv; the first element is the program
    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn input_encoding(&self) -> &str {
        &self.input_encoding
    }

    pub fn output_encoding(&self) -> &str {
        &self.output_encoding
    }

    /// Interactive prompt stripped from authored lines; may be empty
    pub fn prompt_prefix(&self) -> &str {
        &self.prompt_prefix
    }

    fn validate(&self) -> Result<()> {
        if self.command.is_empty() || self.command[0].is_empty() {
            return Err(RunRecordError::InvalidConfig {
                reason: format!("language {} has an empty command", self.tag),
            });
        }
        encoding::lookup(&self.input_encoding)?;
        encoding::lookup(&self.output_encoding)?;
        Ok(())
    }
}

/// Interpreter command, either as one whitespace-separated line or as argv
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Line(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    pub fn into_argv(self) -> Vec<String> {
        match self {
            CommandSpec::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandSpec::Argv(argv) => argv,
        }
    }
}

/// Override for one language; present fields replace the existing values
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageOverride {
    pub command: Option<CommandSpec>,
    pub input_encoding: Option<String>,
    pub output_encoding: Option<String>,
    pub prompt_prefix: Option<String>,
}

/// Frozen tag -> entry mapping for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    entries: BTreeMap<String, LanguageEntry>,
}

impl LanguageRegistry {
    /// Built-in defaults: an interactive Python console and a bash shell
    pub fn builtin() -> Self {
        let entries = [
            LanguageEntry::new(DEFAULT_LANGUAGE, vec!["bash".to_string()])
                .with_prompt_prefix("$ "),
            LanguageEntry::new(
                "pycon",
                vec![
                    "python3".to_string(),
                    "-u".to_string(),
                    "-c".to_string(),
                    PYCON_CONSOLE.to_string(),
                ],
            )
            .with_prompt_prefix(">>> "),
        ]
        .into_iter()
        .map(|entry| (entry.tag.clone(), entry))
        .collect();

        Self { entries }
    }

    /// Built-in defaults merged with `overrides`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when a new tag has no command or a command is empty,
    /// `UnknownEncoding` when an encoding label is not recognised.
    pub fn merged(overrides: &BTreeMap<String, LanguageOverride>) -> Result<Self> {
        Self::builtin().with_overrides(overrides)
    }

    /// Apply overrides to this registry, consuming it
    ///
    /// # Errors
    ///
    /// Same as [`LanguageRegistry::merged`].
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, LanguageOverride>) -> Result<Self> {
        for (tag, over) in overrides {
            let mut entry = match self.entries.remove(tag) {
                Some(existing) => existing,
                None => {
                    let command = over.command.clone().ok_or_else(|| {
                        RunRecordError::InvalidConfig {
                            reason: format!("new language {} must define a command", tag),
                        }
                    })?;
                    LanguageEntry::new(tag.clone(), command.into_argv())
                }
            };

            if let Some(command) = &over.command {
                entry.command = command.clone().into_argv();
            }
            if let Some(label) = &over.input_encoding {
                entry.input_encoding = label.clone();
            }
            if let Some(label) = &over.output_encoding {
                entry.output_encoding = label.clone();
            }
            if let Some(prefix) = &over.prompt_prefix {
                entry.prompt_prefix = prefix.clone();
            }

            entry.validate()?;
            tracing::debug!(language = %tag, command = ?entry.command, "language override applied");
            self.entries.insert(tag.clone(), entry);
        }
        Ok(self)
    }

    /// Look up the entry for `tag`
    ///
    /// # Errors
    ///
    /// `UnknownLanguage` when the tag is not registered.
    pub fn resolve(&self, tag: &str) -> Result<&LanguageEntry> {
        self.entries
            .get(tag)
            .ok_or_else(|| RunRecordError::UnknownLanguage {
                language: tag.to_string(),
            })
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered entries in tag order
    pub fn entries(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.entries.values()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
