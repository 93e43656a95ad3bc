use std::fmt;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Bytes of a file handed to the detector.
pub const ENCODING_PROBE_LEN: usize = 8192;

/// A best-effort charset guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingGuess(&'static Encoding);

impl EncodingGuess {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self(encoding)
    }

    /// Parse a WHATWG label such as `shift_jis` or `latin1`.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self)
    }

    pub fn encoding(self) -> &'static Encoding {
        self.0
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

impl fmt::Display for EncodingGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Guess the encoding of `buf`, looking at no more than [`ENCODING_PROBE_LEN`] bytes.
///
/// Returns `None` for an empty buffer. A byte order mark wins outright;
/// pure ASCII is reported as UTF-8. Everything else goes through the
/// statistical detector, fed once and closed.
pub fn detect_encoding(buf: &[u8]) -> Option<EncodingGuess> {
    let buf = &buf[..buf.len().min(ENCODING_PROBE_LEN)];
    if buf.is_empty() {
        return None;
    }

    if let Some((encoding, _)) = Encoding::for_bom(buf) {
        return Some(EncodingGuess(encoding));
    }

    if buf.is_ascii() {
        return Some(EncodingGuess(UTF_8));
    }

    let mut detector = EncodingDetector::new();
    detector.feed(buf, true);
    Some(EncodingGuess(detector.guess(None, true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_is_absent() {
        assert_eq!(detect_encoding(&[]), None);
    }

    #[test]
    fn ascii_is_utf8() {
        assert_eq!(detect_encoding(b"hello world").map(EncodingGuess::name), Some("UTF-8"));
    }

    #[test]
    fn bom_wins() {
        let utf16 = [0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
        assert_eq!(detect_encoding(&utf16).map(EncodingGuess::name), Some("UTF-16LE"));
    }

    #[test]
    fn utf8_japanese() {
        let text = "日本語のテキストファイルです。文字コードを判定します。".repeat(4);
        assert_eq!(detect_encoding(text.as_bytes()).map(EncodingGuess::name), Some("UTF-8"));
    }

    #[test]
    fn shift_jis_japanese() {
        let text = "日本語のテキストファイルです。文字コードを判定します。".repeat(8);
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&text);
        assert_eq!(
            detect_encoding(&bytes).map(EncodingGuess::name),
            Some("Shift_JIS")
        );
    }

    #[test]
    fn looks_only_at_the_probe_window() {
        let mut buf = vec![b'a'; ENCODING_PROBE_LEN];
        buf.extend_from_slice(&[0xFF, 0xFE, 0xFD]);
        assert_eq!(detect_encoding(&buf).map(EncodingGuess::name), Some("UTF-8"));
    }

    #[test]
    fn label_lookup() {
        assert_eq!(EncodingGuess::for_label(" SJIS ").map(EncodingGuess::name), Some("Shift_JIS"));
        assert_eq!(EncodingGuess::for_label("no-such-charset"), None);
    }

    proptest! {
        #[test]
        fn deterministic_and_total(buf in proptest::collection::vec(any::<u8>(), 0..ENCODING_PROBE_LEN)) {
            let first = detect_encoding(&buf);
            prop_assert_eq!(first, detect_encoding(&buf));
            prop_assert_eq!(first.is_none(), buf.is_empty());
        }
    }
}
