use std::{fmt, path::Path, str::FromStr};

use crate::error::{Error, Result};

/// How source bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 when the bytes are valid UTF-8, Latin-1 otherwise.
    Guess,
    Utf8,
    Latin1,
}

impl Encoding {
    /// The option name `inputenc` knows this encoding by.
    pub fn inputenc(self) -> &'static str {
        match self {
            Encoding::Guess | Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "guess" => Ok(Encoding::Guess),
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            _ => Err(Error::UnknownEncoding(name.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Guess => "guess",
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
        })
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Decodes `bytes`, returning the text and the encoding actually used.
///
/// A UTF-8 byte order mark is dropped. `Guess` never fails.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Option<(String, Encoding)> {
    match encoding {
        Encoding::Latin1 => Some((latin1(bytes), Encoding::Latin1)),
        Encoding::Utf8 | Encoding::Guess => {
            let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
            match std::str::from_utf8(bytes) {
                Ok(text) => Some((text.to_string(), Encoding::Utf8)),
                Err(_) if encoding == Encoding::Guess => Some((latin1(bytes), Encoding::Latin1)),
                Err(_) => None,
            }
        }
    }
}

/// Reads and decodes a source file.
pub fn read_source(path: &Path, encoding: Encoding) -> Result<(String, Encoding)> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode(&bytes, encoding).ok_or_else(|| Error::Decode {
        path: path.to_path_buf(),
        encoding: encoding.to_string(),
    })?;
    tracing::debug!(path = %path.display(), encoding = %decoded.1, "read source");
    Ok(decoded)
}
