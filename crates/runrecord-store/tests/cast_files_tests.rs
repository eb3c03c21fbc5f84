// Integration tests for cast script and listing files
// Covers append-only growth and the duplication a rebuild causes without a
// clean step.

use proptest::prelude::*;
use runrecord_store::cast_files::{append_cast, append_listing, indent_code, CastPaths};
use runrecord_store::clean::clean_cast_dir;
use std::fs;
use tempfile::TempDir;

fn build_once(paths: &CastPaths, snippets: &[&str], first_number: u64) {
    for (offset, code) in snippets.iter().enumerate() {
        let number = first_number + offset as u64;
        append_cast(&paths.script, &format!("Code snippet {}", number), code, number).unwrap();
        append_listing(paths, number, code).unwrap();
    }
}

fn count_prefixed(text: &str, prefix: &str) -> usize {
    text.lines().filter(|l| l.starts_with(prefix)).count()
}

#[test]
fn test_n_snippets_give_n_record_pairs_in_order() {
    let dir = TempDir::new().unwrap();
    let paths = CastPaths::new(dir.path(), "tour");

    build_once(&paths, &["echo one", "echo two", "echo three"], 1);

    let script = fs::read_to_string(&paths.script).unwrap();
    assert_eq!(count_prefixed(&script, "announce "), 3);
    assert_eq!(count_prefixed(&script, "run "), 3);

    let one = script.find("echo one").unwrap();
    let two = script.find("echo two").unwrap();
    let three = script.find("echo three").unwrap();
    assert!(one < two && two < three);
}

#[test]
fn test_rebuild_without_clean_duplicates_entries() {
    let dir = TempDir::new().unwrap();
    let paths = CastPaths::new(dir.path(), "tour");

    build_once(&paths, &["ls", "pwd"], 1);
    build_once(&paths, &["ls", "pwd"], 1);

    let script = fs::read_to_string(&paths.script).unwrap();
    assert_eq!(count_prefixed(&script, "run "), 4);

    let listing = fs::read_to_string(&paths.listing).unwrap();
    assert_eq!(count_prefixed(&listing, "Code from chapter: "), 1);
    assert_eq!(count_prefixed(&listing, "Code snippet 1::"), 2);
}

#[test]
fn test_rebuild_after_clean_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let paths = CastPaths::new(dir.path(), "tour");

    build_once(&paths, &["ls", "pwd"], 1);
    clean_cast_dir(dir.path()).unwrap();
    build_once(&paths, &["ls", "pwd"], 1);

    let script = fs::read_to_string(&paths.script).unwrap();
    assert_eq!(count_prefixed(&script, "run "), 2);
}

#[test]
fn test_multiline_code_stays_one_run_token() {
    let dir = TempDir::new().unwrap();
    let paths = CastPaths::new(dir.path(), "multi");

    append_cast(&paths.script, "It's here", "cd /tmp\nls 'a b'", 7).unwrap();

    let script = fs::read_to_string(&paths.script).unwrap();
    assert_eq!(
        script,
        "announce 'It'\"'\"'s here'\n\
         run '### Code snippet 7\ncd /tmp\nls '\"'\"'a b'\"'\"''\n"
    );
}

proptest! {
    #[test]
    fn indent_preserves_text_modulo_prefix(lines in proptest::collection::vec("[a-z ]{0,10}", 0..8)) {
        let code = lines.join("\n");
        let indented = indent_code(&code, "   ");

        let restored: Vec<&str> = indented
            .split('\n')
            .map(|line| line.strip_prefix("   ").filter(|_| !line.trim().is_empty()).unwrap_or(line))
            .collect();
        prop_assert_eq!(restored.join("\n"), code);
    }
}
