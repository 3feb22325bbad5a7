use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::errors::EncodeError;

/// Text encodings accepted by `write_contents`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// ISO-8859-1; code points above U+00FF are rejected.
    Latin1,
}

impl TextEncoding {
    /// Canonical label, as used in `Display` and log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Encode `text`, borrowing when the bytes are already in the right form.
    ///
    /// # Errors
    ///
    /// `EncodeError::Unrepresentable` for the first character the encoding
    /// cannot express.
    pub fn encode<'a>(self, text: &'a str) -> Result<Cow<'a, [u8]>, EncodeError> {
        match self {
            TextEncoding::Utf8 => Ok(Cow::Borrowed(text.as_bytes())),
            TextEncoding::Utf16Le => Ok(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            )),
            TextEncoding::Utf16Be => Ok(Cow::Owned(
                text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            )),
            TextEncoding::Latin1 => {
                let mut out = Vec::with_capacity(text.len());
                for (offset, ch) in text.char_indices() {
                    let byte = u8::try_from(u32::from(ch)).map_err(|_| {
                        EncodeError::Unrepresentable {
                            ch,
                            offset,
                            encoding: self,
                        }
                    })?;
                    out.push(byte);
                }
                Ok(Cow::Owned(out))
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = EncodeError;

    /// Labels are matched case-insensitively, ignoring `-` and `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match norm.as_str() {
            "utf8" => Ok(TextEncoding::Utf8),
            "utf16le" => Ok(TextEncoding::Utf16Le),
            "utf16be" => Ok(TextEncoding::Utf16Be),
            "latin1" | "iso88591" | "l1" => Ok(TextEncoding::Latin1),
            _ => Err(EncodeError::UnknownEncoding(s.to_string())),
        }
    }
}

/// New file contents: raw bytes, or text that still needs encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Contents<'a> {
    Bytes(Cow<'a, [u8]>),
    Text(Cow<'a, str>),
}

impl<'a> Contents<'a> {
    /// Bytes to write. Raw bytes pass through; text goes through `encoding`.
    ///
    /// # Errors
    ///
    /// Propagates `EncodeError` from `TextEncoding::encode`.
    pub fn encode(&self, encoding: TextEncoding) -> Result<Cow<'_, [u8]>, EncodeError> {
        match self {
            Contents::Bytes(b) => Ok(Cow::Borrowed(b.as_ref())),
            Contents::Text(t) => encoding.encode(t),
        }
    }
}

impl<'a> From<&'a [u8]> for Contents<'a> {
    fn from(b: &'a [u8]) -> Self {
        Contents::Bytes(Cow::Borrowed(b))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Contents<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Contents::Bytes(Cow::Borrowed(b.as_slice()))
    }
}

impl From<Vec<u8>> for Contents<'static> {
    fn from(b: Vec<u8>) -> Self {
        Contents::Bytes(Cow::Owned(b))
    }
}

impl<'a> From<&'a str> for Contents<'a> {
    fn from(t: &'a str) -> Self {
        Contents::Text(Cow::Borrowed(t))
    }
}

impl From<String> for Contents<'static> {
    fn from(t: String) -> Self {
        Contents::Text(Cow::Owned(t))
    }
}
