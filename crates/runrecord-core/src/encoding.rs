//! Interpreter input/output encodings
//!
//! Labels follow the WHATWG encoding names (`utf-8`, `latin1`, `shift_jis`,
//! `utf-16le`, ...). Both directions are strict: text that cannot be
//! represented, or bytes that cannot be decoded, are errors rather than
//! silently replaced.

use crate::errors::{Result, RunRecordError};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Resolve an encoding label
pub fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| RunRecordError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Encode `text` for an interpreter's standard input
pub fn encode(text: &str, label: &str) -> Result<Vec<u8>> {
    let encoding = lookup(label)?;

    // encoding_rs only encodes to ASCII-compatible targets
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(RunRecordError::Encoding {
            encoding: encoding.name().to_string(),
            reason: "snippet contains characters the input encoding cannot represent"
                .to_string(),
        });
    }
    Ok(bytes.into_owned())
}

/// Decode captured interpreter output
pub fn decode(bytes: &[u8], label: &str) -> Result<String> {
    let encoding = lookup(label)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| RunRecordError::Encoding {
            encoding: encoding.name().to_string(),
            reason: "captured output is not valid in the output encoding".to_string(),
        })
}
