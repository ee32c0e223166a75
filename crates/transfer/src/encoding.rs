//! Text encodings for buffered reads and text writes.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Result, TransferError};

/// How text maps to bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// One byte per character, U+0000..=U+00FF.
    Latin1,
    Hex,
    Base64,
}

impl TextEncoding {
    /// Converts bytes to text.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn decode(self, bytes: Vec<u8>) -> String {
        match self {
            Self::Utf8 => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }

    /// Converts text to bytes.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        TransferError::InvalidInput(format!(
                            "character {c:?} is not representable in latin1"
                        ))
                    })
                })
                .collect(),
            Self::Hex => hex::decode(text)
                .map_err(|e| TransferError::InvalidInput(format!("invalid hex input: {e}"))),
            Self::Base64 => STANDARD
                .decode(text)
                .map_err(|e| TransferError::InvalidInput(format!("invalid base64 input: {e}"))),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = TransferError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "binary" => Ok(Self::Latin1),
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            _ => Err(TransferError::UnsupportedEncoding(s.to_string())),
        }
    }
}
