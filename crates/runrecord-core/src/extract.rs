//! Snippet extraction
//!
//! Turns authored content into the exact text fed to an interpreter.

use crate::encoding;
use crate::errors::Result;
use crate::language::LanguageEntry;
use crate::request::SnippetRequest;

/// Code to execute and to record for `request`
///
/// A literal command wins unconditionally. Otherwise each line starting with
/// the language's prompt prefix loses exactly that prefix and every other
/// line passes through, so continuation and output lines may be mixed in.
pub fn extract_code(request: &SnippetRequest, entry: &LanguageEntry) -> String {
    match &request.literal_command {
        Some(command) => command.clone(),
        None => strip_prompts(&request.content, entry.prompt_prefix()),
    }
}

/// Strip `prefix` from each line that starts with it and join with `\n`
pub fn strip_prompts<S: AsRef<str>>(lines: &[S], prefix: &str) -> String {
    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            line.strip_prefix(prefix).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracted code encoded with the language's input encoding
pub fn encoded_code(request: &SnippetRequest, entry: &LanguageEntry) -> Result<Vec<u8>> {
    encoding::encode(&extract_code(request, entry), entry.input_encoding())
}

/// Interpreter output decoded with the language's output encoding
pub fn decode_output(bytes: &[u8], entry: &LanguageEntry) -> Result<String> {
    encoding::decode(bytes, entry.output_encoding())
}
