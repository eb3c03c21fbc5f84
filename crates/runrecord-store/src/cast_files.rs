//! Cast script and listing files
//!
//! Each cast tag owns two append-only files inside the cast directory:
//!
//! - the script `<tag>`, two replay actions per snippet:
//!   `announce <caption>` then `run <code>`, each a single shell word;
//! - the listing `<tag>_code.rst`, a header written on creation followed by
//!   one numbered literal block per snippet.
//!
//! Files are never truncated. A rebuild that does not clean the cast
//! directory first appends a second copy of every entry.

use crate::errors::{io_error, Result};
use runrecord_core::quote::quote;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to the tag to name the listing file
pub const LISTING_SUFFIX: &str = "_code.rst";

/// Indentation of code inside a listing block
pub const LISTING_INDENT: &str = "   ";

/// Resolved file locations for one cast tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastPaths {
    pub script: PathBuf,
    pub listing: PathBuf,
    /// Chapter name shown in the listing header
    pub chapter: String,
    /// Length of the dash run under the listing title
    pub rule_len: usize,
}

impl CastPaths {
    pub fn new(cast_dir: &Path, tag: &str) -> Self {
        let script = cast_dir.join(tag);
        let listing_name = format!("{}{}", tag, LISTING_SUFFIX);
        let chapter = script
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| tag.to_string());

        Self {
            listing: cast_dir.join(&listing_name),
            rule_len: listing_name.chars().count(),
            script,
            chapter,
        }
    }
}

/// Heading each run action carries so the replay shows the snippet number
pub fn snippet_heading(number: u64) -> String {
    format!("### Code snippet {}", number)
}

/// Caption used when a snippet has no notes
pub fn default_announcement(number: u64) -> String {
    format!("Code snippet {}", number)
}

/// Indent every line that has non-whitespace content
pub fn indent_code(code: &str, prefix: &str) -> String {
    code.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect()
}

fn append(path: &Path, op: &str, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_error(op, path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| io_error(op, path, e))
}

/// Append one announce/run record to a cast script
pub fn append_cast(script_path: &Path, announcement: &str, code: &str, number: u64) -> Result<()> {
    let run = format!("{}\n{}", snippet_heading(number), code);
    let record = format!("announce {}\nrun {}\n", quote(announcement), quote(&run));

    append(script_path, "append_cast", &record)?;
    tracing::debug!(path = %script_path.display(), snippet_number = number, "cast record appended");
    Ok(())
}

/// Append one numbered block to a cast listing, writing the header first
/// when the listing does not exist yet
pub fn append_listing(paths: &CastPaths, number: u64, code: &str) -> Result<()> {
    let mut text = String::new();
    if !paths.listing.exists() {
        text.push_str(&format!(
            "Code from chapter: {}\n----------{}\n\n",
            paths.chapter,
            "-".repeat(paths.rule_len)
        ));
    }
    text.push_str(&format!(
        "Code snippet {}::\n\n{}\n\n\n",
        number,
        indent_code(code, LISTING_INDENT)
    ));

    append(&paths.listing, "append_listing", &text)?;
    tracing::debug!(path = %paths.listing.display(), snippet_number = number, "listing block appended");
    Ok(())
}

/// Create the cast directory and its parents
pub fn ensure_cast_dir(cast_dir: &Path) -> Result<()> {
    fs::create_dir_all(cast_dir).map_err(|e| io_error("create_cast_dir", cast_dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_for_tag() {
        let paths = CastPaths::new(Path::new("/casts"), "intro");
        assert_eq!(paths.script, PathBuf::from("/casts/intro"));
        assert_eq!(paths.listing, PathBuf::from("/casts/intro_code.rst"));
        assert_eq!(paths.chapter, "intro");
        assert_eq!(paths.rule_len, "intro_code.rst".len());
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent_code("a\n\n  \nb", "   "), "   a\n\n  \n   b");
    }

    #[test]
    fn test_cast_record_format() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("intro");

        append_cast(&script, "List files", "ls -l", 3).unwrap();

        assert_eq!(
            fs::read_to_string(&script).unwrap(),
            "announce 'List files'\nrun '### Code snippet 3\nls -l'\n"
        );
    }

    #[test]
    fn test_cast_appends_never_truncate() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("intro");

        append_cast(&script, "one", "true", 1).unwrap();
        append_cast(&script, "two", "false", 2).unwrap();

        let text = fs::read_to_string(&script).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("announce ")).count(), 2);
        assert!(text.starts_with("announce one\n"));
        assert!(text.contains("announce two\n"));
    }

    #[test]
    fn test_listing_header_written_once() {
        let dir = TempDir::new().unwrap();
        let paths = CastPaths::new(dir.path(), "ch1");

        append_listing(&paths, 1, "echo a").unwrap();
        append_listing(&paths, 2, "echo b\n\necho c").unwrap();

        // Ten dashes plus one per character of "ch1_code.rst"
        let expected = format!(
            "Code from chapter: ch1\n{}\n\n\
             Code snippet 1::\n\n   echo a\n\n\n\
             Code snippet 2::\n\n   echo b\n\n   echo c\n\n\n",
            "-".repeat(22)
        );
        assert_eq!(fs::read_to_string(&paths.listing).unwrap(), expected);
    }
}
