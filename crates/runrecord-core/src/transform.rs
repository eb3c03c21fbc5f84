//! Output transformation via ordered replace rules
//!
//! Rules come from two places: the build configuration (global, applied
//! first) and the snippet itself, written in a sed-like line syntax
//! `<d>pattern<d>replacement<d>` where `<d>` is the line's first character.
//!
//! Patterns are regular expressions compiled in multi-line mode, so `^` and
//! `$` anchor at every line. Replacements use the sed/Python template
//! convention: `\1` or `\g<name>` for groups, `\n` and `\t` for control
//! characters, `\\` for a backslash. A `$` in a replacement is literal.

use crate::errors::{Result, RunRecordError};
use regex::{Regex, RegexBuilder};

/// One validated pattern/replacement pair
#[derive(Debug, Clone)]
pub struct ReplaceRule {
    regex: Regex,
    replacement: String,
    expansion: String,
}

impl ReplaceRule {
    /// Compile a rule
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when the pattern does not compile or the replacement
    /// refers to a group the pattern does not define.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let invalid = |reason: String| RunRecordError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        let (expansion, refs) = translate_template(replacement).map_err(invalid)?;
        for group in refs {
            let known = match &group {
                GroupRef::Index(index) => *index < regex.captures_len(),
                GroupRef::Name(name) => regex.capture_names().flatten().any(|n| n == name),
            };
            if !known {
                return Err(invalid(format!("invalid group reference {}", group)));
            }
        }

        Ok(Self {
            regex,
            replacement: replacement.to_string(),
            expansion,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement as authored
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in `text`
    pub fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, self.expansion.as_str())
            .into_owned()
    }
}

impl PartialEq for ReplaceRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern() && self.replacement == other.replacement
    }
}

#[derive(Debug)]
enum GroupRef {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for GroupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupRef::Index(index) => write!(f, "{}", index),
            GroupRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Rewrite a sed/Python style template into `regex` expansion syntax
fn translate_template(template: &str) -> std::result::Result<(String, Vec<GroupRef>), String> {
    let mut out = String::with_capacity(template.len());
    let mut refs = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                None => return Err("replacement ends with a lone backslash".to_string()),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('0') => out.push('\0'),
                Some(d) if d.is_ascii_digit() => {
                    let mut digits = d.to_string();
                    if let Some(next) = chars.peek().copied().filter(char::is_ascii_digit) {
                        digits.push(next);
                        chars.next();
                    }
                    out.push_str(&format!("${{{}}}", digits));
                    refs.push(GroupRef::Index(digits.parse().unwrap_or(usize::MAX)));
                }
                Some('g') => {
                    if chars.next() != Some('<') {
                        return Err("expected '<' after \\g".to_string());
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err("unterminated \\g<...> group name".to_string()),
                        }
                    }
                    if name.is_empty() {
                        return Err("empty \\g<> group name".to_string());
                    }
                    out.push_str(&format!("${{{}}}", name));
                    refs.push(match name.parse::<usize>() {
                        Ok(index) => GroupRef::Index(index),
                        Err(_) => GroupRef::Name(name),
                    });
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
            },
            other => out.push(other),
        }
    }

    Ok((out, refs))
}

/// Parse one `<d>pattern<d>replacement<d>` line
///
/// # Errors
///
/// `MalformedReplaceRule` when the last character differs from the first
/// or the line does not split into exactly pattern and replacement;
/// `InvalidPattern` when the fields do not compile.
pub fn parse_replace_rule(line: &str) -> Result<ReplaceRule> {
    let malformed = |reason: String| RunRecordError::MalformedReplaceRule {
        rule: line.to_string(),
        reason,
    };

    let delim = line
        .chars()
        .next()
        .ok_or_else(|| malformed("empty rule".to_string()))?;
    if line.chars().count() < 2 || !line.ends_with(delim) {
        return Err(malformed(format!(
            "rule must end with its delimiter {:?}",
            delim
        )));
    }

    let fields: Vec<&str> = line.split(delim).collect();
    if fields.len() != 4 {
        return Err(malformed(format!(
            "expected {d}pattern{d}replacement{d}, found {} delimiters",
            fields.len() - 1,
            d = delim
        )));
    }

    ReplaceRule::new(fields[1], fields[2])
}

/// Parse a block of rules, one per line; blank lines are skipped
///
/// A single malformed line rejects the whole block.
pub fn parse_replace_rules(text: &str) -> Result<Vec<ReplaceRule>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_replace_rule)
        .collect()
}

/// Apply `rules` in order, each rule's output feeding the next
pub fn transform<'a, I>(output: &str, rules: I) -> String
where
    I: IntoIterator<Item = &'a ReplaceRule>,
{
    rules
        .into_iter()
        .fold(output.to_string(), |text, rule| rule.apply(&text))
}

/// Apply global rules, then per-snippet rules
pub fn transform_output(output: &str, global: &[ReplaceRule], local: &[ReplaceRule]) -> String {
    transform(output, global.iter().chain(local))
}
