//! "Key-value list with message": the shared grammar behind commit and
//! tag objects. A sequence of `key SP value LF` lines (continuation
//! lines inside a value start with a leading space, stripped on parse
//! and reinserted on serialize), a blank line, then the free-form
//! message.

use ordered_multimap::ListOrderedMultimap;

/// An ordered mapping from header key to one-or-more values, preserving
/// insertion order and repeat-key occurrence order, plus the message
/// body. `ListOrderedMultimap` gives us exactly this: iteration in
/// insertion order, and `get_all` for repeated keys (e.g. multiple
/// `parent` lines on a merge commit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    fields: ListOrderedMultimap<String, String>,
    pub message: String,
}

impl Kvlm {
    pub fn new() -> Kvlm {
        Kvlm::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.fields.get_all(key).map(String::as_str).collect()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.append(key.into(), value.into());
    }

    pub fn keys_in_order(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for (k, _) in self.fields.iter() {
            if seen.insert(k.as_str()) {
                out.push(k.as_str());
            }
        }
        out
    }

    /// Parses a full commit/tag payload. Scans forward: if the next LF
    /// precedes the next SP (or there is no further SP), the remainder
    /// starting one byte past the cursor is the message. Otherwise reads
    /// `key SP value`, where `value` absorbs continuation lines
    /// (subsequent lines starting with a literal space), unescaping
    /// `"\n "` to `"\n"`.
    pub fn parse(data: &[u8]) -> Kvlm {
        let mut kvlm = Kvlm::new();
        let mut i = 0usize;
        loop {
            let sp = find_byte(data, i, b' ');
            let nl = find_byte(data, i, b'\n');

            let is_message = match (sp, nl) {
                (Some(sp), Some(nl)) => nl < sp,
                (None, _) => true,
                (Some(_), None) => true,
            };

            if is_message {
                let start = (i + 1).min(data.len());
                kvlm.message = String::from_utf8_lossy(&data[start..]).into_owned();
                break;
            }

            let sp = sp.unwrap();
            let key = String::from_utf8_lossy(&data[i..sp]).into_owned();

            // Find the end of the value: advance through LFs while the
            // following byte is a continuation space.
            let mut end = sp;
            loop {
                match find_byte(data, end + 1, b'\n') {
                    Some(nl) => {
                        if data.get(nl + 1) == Some(&b' ') {
                            end = nl;
                        } else {
                            end = nl;
                            break;
                        }
                    }
                    None => {
                        end = data.len();
                        break;
                    }
                }
            }

            let raw_value = &data[sp + 1..end];
            let value = String::from_utf8_lossy(raw_value)
                .replace("\n ", "\n")
                .to_string();
            kvlm.append(key, value);

            i = end + 1;
            if i > data.len() {
                break;
            }
        }
        kvlm
    }

    /// Serializes back to the `key SP value LF ... LF message` form.
    /// `serialize(parse(x)) == x` for any well-formed `x`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for key in self.keys_in_order() {
            for value in self.fields.get_all(key) {
                out.extend_from_slice(key.as_bytes());
                out.push(b' ');
                out.extend_from_slice(value.replace('\n', "\n ").as_bytes());
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(self.message.as_bytes());
        out
    }
}

fn find_byte(data: &[u8], from: usize, needle: u8) -> Option<usize> {
    if from > data.len() {
        return None;
    }
    data[from..].iter().position(|&b| b == needle).map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\nparent 206941306e8a8af65b66eaaaea388a7ae24d49a0\nauthor Thibault Polge <thibault@thb.lt> 1527025023 +0200\ncommitter Thibault Polge <thibault@thb.lt> 1527025044 +0200\ngpgsig -----BEGIN PGP SIGNATURE-----\n\n iQIzBAABCAAdFiEE\n mQINBFka\n -----END PGP SIGNATURE-----\n\nCreate first draft\n";

    #[test]
    fn roundtrip() {
        let kvlm = Kvlm::parse(COMMIT);
        assert_eq!(kvlm.get("tree"), Some("29ff16c9c14e2652b22f8b78bb08a5a07930c147"));
        assert_eq!(kvlm.message, "Create first draft\n");
        assert_eq!(kvlm.serialize(), COMMIT);
    }

    #[test]
    fn continuation_unescape() {
        let kvlm = Kvlm::parse(COMMIT);
        let sig = kvlm.get("gpgsig").unwrap();
        assert!(sig.contains("-----BEGIN PGP SIGNATURE-----\n"));
        assert!(!sig.contains("\n "));
    }

    #[test]
    fn repeated_key_list_preserves_order() {
        let data = b"tree aaaa\nparent 1111\nparent 2222\nauthor a\n\nmsg\n";
        let kvlm = Kvlm::parse(data);
        assert_eq!(kvlm.get_all("parent"), vec!["1111", "2222"]);
        assert_eq!(kvlm.serialize(), data);
    }

    #[test]
    fn empty_message() {
        let data = b"tree aaaa\n\n";
        let kvlm = Kvlm::parse(data);
        assert_eq!(kvlm.message, "");
        assert_eq!(kvlm.serialize(), data);
    }
}
