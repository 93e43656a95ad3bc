use std::env;

use codepage_437::{CP437_CONTROL, FromCp437, IntoCp437};
use encoding_rs::Encoding;

use crate::central::RawEntry;

/// How names are recovered when no entry of an archive declares UTF-8.
///
/// The raw bytes are read as CP437. With a locale encoding set, those
/// characters are turned back into CP437 bytes and decoded under the
/// locale encoding instead. This recovers names written by tools that
/// stored the local charset without saying so. A name that does not decode
/// cleanly under the locale keeps its CP437 reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NameDecoding {
    locale: Option<&'static Encoding>,
}

impl NameDecoding {
    /// Names stay CP437-decoded.
    pub fn cp437_only() -> Self {
        Self { locale: None }
    }

    /// Use the charset of `LC_ALL`, `LC_CTYPE` or `LANG`, first one set wins.
    pub fn from_locale() -> Self {
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty());
        Self {
            locale: locale.as_deref().and_then(locale_encoding),
        }
    }

    /// Explicit encoding label; an unknown label means CP437 only.
    pub fn with_encoding(label: &str) -> Self {
        Self {
            locale: encoding_for_charset(label),
        }
    }

    pub fn locale(&self) -> Option<&'static Encoding> {
        self.locale
    }

    /// Decode one name under the archive-wide `declares_utf8` decision.
    pub fn decode(&self, raw: &[u8], declares_utf8: bool) -> String {
        if declares_utf8 {
            return String::from_utf8_lossy(raw).into_owned();
        }
        let cp437 = String::from_cp437(raw.to_vec(), &CP437_CONTROL);
        let Some(locale) = self.locale else {
            return cp437;
        };
        let Ok(bytes) = cp437.clone().into_cp437(&CP437_CONTROL) else {
            return cp437;
        };
        match locale.decode_without_bom_handling(&bytes) {
            (recovered, false) => recovered.into_owned(),
            (_, true) => cp437,
        }
    }
}

/// `ja_JP.SJIS@mod` -> `SJIS`; `C` and `POSIX` carry no charset.
fn locale_encoding(value: &str) -> Option<&'static Encoding> {
    let charset = value.split_once('.')?.1;
    let charset = charset.split_once('@').map_or(charset, |(c, _)| c);
    encoding_for_charset(charset)
}

fn encoding_for_charset(charset: &str) -> Option<&'static Encoding> {
    let normalized = charset.trim().to_ascii_lowercase();
    let label = match normalized.as_str() {
        "utf8" => "utf-8",
        "eucjp" | "ujis" => "euc-jp",
        "euckr" => "euc-kr",
        "euccn" => "gb2312",
        "big5hkscs" => "big5",
        "cp932" => "shift_jis",
        "cp936" => "gbk",
        "cp949" => "euc-kr",
        "cp950" => "big5",
        other => other,
    };
    Encoding::for_label(label.as_bytes())
}

/// An entry with its name decoded once for the whole operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub raw_name: Vec<u8>,
    pub flags: u16,
    pub decoded_name: String,
}

impl ArchiveEntry {
    pub fn is_dir(&self) -> bool {
        self.decoded_name.ends_with('/')
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & crate::central::FLAG_ENCRYPTED != 0
    }
}

/// All entries of one archive, decoded under a single rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveIndex {
    pub declares_utf8: bool,
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveIndex {
    /// The UTF-8 decision is made over every record before any name is decoded.
    pub fn decode(records: Vec<RawEntry>, names: &NameDecoding) -> Self {
        let declares_utf8 = records.iter().any(RawEntry::is_utf8);
        let entries = records
            .into_iter()
            .map(|r| {
                let decoded_name = names.decode(&r.raw_name, declares_utf8);
                ArchiveEntry {
                    raw_name: r.raw_name,
                    flags: r.flags,
                    decoded_name,
                }
            })
            .collect();
        Self {
            declares_utf8,
            entries,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.decoded_name.clone()).collect()
    }

    pub fn find(&self, raw_name: &[u8]) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.raw_name == raw_name)
    }
}
