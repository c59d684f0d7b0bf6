use crate::skiplist::SkipList;
use crate::Error;
use rand::prelude::StdRng;
use rand::Rng;
use std::fmt::Display;
use std::str::FromStr;

const SEPARATOR: char = ':';
const ESCAPE: char = '\\';

/// A key or value that can be written to and read back from one text field.
///
/// Implemented for every type with matching `Display` and `FromStr` impls.
pub trait TextField: Sized {
    fn write_field(&self) -> String;
    fn read_field(text: &str) -> Result<Self, String>;
}

impl<T> TextField for T
where
    T: Display + FromStr,
    T::Err: Display,
{
    fn write_field(&self) -> String {
        self.to_string()
    }

    fn read_field(text: &str) -> Result<Self, String> {
        text.parse().map_err(|e: T::Err| e.to_string())
    }
}

fn escape_into(dst: &mut String, field: &str) {
    for c in field.chars() {
        match c {
            ESCAPE => dst.push_str("\\\\"),
            SEPARATOR => dst.push_str("\\:"),
            '\n' => dst.push_str("\\n"),
            '\r' => dst.push_str("\\r"),
            c => dst.push(c),
        }
    }
}

/// Splits one line on its single unescaped separator and unescapes both sides.
fn split_record(line: &str) -> Result<(String, String), &'static str> {
    let mut fields = [String::new(), String::new()];
    let mut current = 0;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                let unescaped = match chars.next() {
                    Some(ESCAPE) => ESCAPE,
                    Some(SEPARATOR) => SEPARATOR,
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some(_) => return Err("unknown escape sequence"),
                    None => return Err("dangling escape at end of line"),
                };
                fields[current].push(unescaped);
            }
            SEPARATOR if current == 0 => current = 1,
            SEPARATOR => return Err("more than one separator"),
            '\r' => return Err("unescaped carriage return"),
            c => fields[current].push(c),
        }
    }
    if current == 0 {
        return Err("missing separator");
    }
    let [key, value] = fields;
    Ok((key, value))
}

/// Parses every line of `text` before anything is handed to a list.
fn parse_records<K, V>(text: &str) -> crate::Result<Vec<(K, V)>>
where
    K: TextField,
    V: TextField,
{
    let body = text.strip_suffix('\n').unwrap_or(text);
    if body.is_empty() {
        return Ok(vec![]);
    }
    body.split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line_no = i + 1;
            let (key, value) = split_record(line).map_err(|reason| Error::parse(line_no, reason))?;
            let key = K::read_field(&key)
                .map_err(|e| Error::parse(line_no, format!("invalid key: {}", e)))?;
            let value = V::read_field(&value)
                .map_err(|e| Error::parse(line_no, format!("invalid value: {}", e)))?;
            Ok((key, value))
        })
        .collect()
}

impl<K, V, R> SkipList<K, V, R>
where
    K: TextField,
    V: TextField,
{
    /// Renders the list as one `key:value` line per entry in ascending key
    /// order. `\`, `:`, newlines and carriage returns inside fields are
    /// backslash escaped.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            escape_into(&mut out, &key.write_field());
            out.push(SEPARATOR);
            escape_into(&mut out, &value.write_field());
            out.push('\n');
        }
        out
    }
}

impl<K, V, R> SkipList<K, V, R>
where
    K: Ord + TextField,
    V: TextField,
    R: Rng,
{
    /// Replaces the contents of the list with the entries encoded in `text`.
    ///
    /// The whole input is validated first; on error the list is left as it
    /// was.
    pub fn decode_into(&mut self, text: &str) -> crate::Result<()> {
        let records = parse_records::<K, V>(text)?;
        self.clear();
        self.extend(records);
        Ok(())
    }
}

impl<K, V> SkipList<K, V, StdRng>
where
    K: Ord + TextField,
    V: TextField,
{
    pub fn decode(text: &str, opts: crate::SkipListOptions) -> crate::Result<Self> {
        let mut skl = Self::with_options(opts)?;
        skl.decode_into(text)?;
        Ok(skl)
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::split_record;
    use crate::test_utils::{make_skiplist, scenario_list};
    use crate::{Error, SkipList, SkipListOptions};
    use pretty_assertions::assert_eq;

    fn opts() -> SkipListOptions {
        SkipListOptions::default().with_seed(7)
    }

    #[test]
    fn test_encode_scenario() {
        let skl = scenario_list();
        assert_eq!(skl.encode(), "key1:updatedValue1\nkey3:value3\n");
    }

    #[test]
    fn test_decode_scenario() {
        let text = scenario_list().encode();
        let skl: SkipList<String, String> = SkipList::decode(&text, opts()).unwrap();
        assert_eq!(skl.size(), 2);
        assert_eq!(skl.search("key1").unwrap(), "updatedValue1");
        assert_eq!(skl.search("key3").unwrap(), "value3");
        assert!(skl.search("key2").is_none());
        skl.assert_invariants();
    }

    #[test]
    fn test_empty() {
        let skl: SkipList<String, String> = SkipList::new();
        assert_eq!(skl.encode(), "");
        let skl: SkipList<String, String> = SkipList::decode("", opts()).unwrap();
        assert!(skl.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let skl = make_skiplist();
        let decoded: SkipList<String, String> = SkipList::decode(&skl.encode(), opts()).unwrap();
        let expected: Vec<_> = skl.iter().collect();
        let actual: Vec<_> = decoded.iter().collect();
        assert_eq!(actual, expected);
        decoded.assert_invariants();
    }

    #[test]
    fn test_round_trip_escapes() {
        let mut skl = SkipList::with_options(opts()).unwrap();
        let entries = [
            ("a:b", "c:d:e"),
            ("back\\slash", "\\"),
            ("multi\nline", "cr\r\nlf"),
            ("", ""),
            ("\\:", ":\\n"),
            ("unicode ✓", "ключ"),
        ];
        for (k, v) in entries {
            skl.insert(k.to_string(), v.to_string());
        }
        let text = skl.encode();
        assert_eq!(text.lines().count(), entries.len());

        let decoded: SkipList<String, String> = SkipList::decode(&text, opts()).unwrap();
        let expected: Vec<_> = skl.iter().collect();
        let actual: Vec<_> = decoded.iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_numeric_fields() {
        let mut skl = SkipList::with_options(opts()).unwrap();
        for i in [30_i64, -5, 12, 0] {
            skl.insert(i, i as f64 / 4.0);
        }
        assert_eq!(skl.encode(), "-5:-1.25\n0:0\n12:3\n30:7.5\n");
        let decoded: SkipList<i64, f64> = SkipList::decode(&skl.encode(), opts()).unwrap();
        assert_eq!(decoded.search(&30), Some(&7.5));
        assert_eq!(decoded.size(), 4);
    }

    #[test]
    fn test_decode_lone_newline_is_empty() {
        let skl: SkipList<String, String> = SkipList::decode("\n", opts()).unwrap();
        assert!(skl.is_empty());
        let mut skl = make_skiplist();
        skl.decode_into("\n").unwrap();
        assert!(skl.is_empty());
        skl.assert_invariants();
    }

    #[test]
    fn test_decode_without_trailing_newline() {
        let skl: SkipList<String, String> = SkipList::decode("b:2\na:1", opts()).unwrap();
        let keys: Vec<_> = skl.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(keys, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_decode_later_lines_win() {
        let skl: SkipList<String, String> = SkipList::decode("a:1\na:2\n", opts()).unwrap();
        assert_eq!(skl.size(), 1);
        assert_eq!(skl.search("a").unwrap(), "2");
    }

    #[test]
    fn test_decode_replaces_contents() {
        let mut skl = make_skiplist();
        skl.decode_into("zz:top\n").unwrap();
        assert_eq!(skl.size(), 1);
        assert!(skl.search("aba").is_none());
        skl.assert_invariants();
    }

    #[test]
    fn test_malformed_leaves_target_untouched() {
        let cases = [
            ("a:1\nnoseparator\n", 2),
            ("a:1:2\n", 1),
            ("a:1\n\nb:2\n", 2),
            ("a:1\r\nb:2\r\n", 1),
            ("a\\x:1\n", 1),
            ("a:1\\", 1),
        ];
        for (text, line) in cases {
            let mut skl = make_skiplist();
            let before = skl.encode();
            match skl.decode_into(text) {
                Err(Error::Parse { line: actual, .. }) => assert_eq!(actual, line, "{:?}", text),
                other => panic!("{:?} decoded to {:?}", text, other),
            }
            assert_eq!(skl.encode(), before);
        }
    }

    #[test]
    fn test_field_parse_error() {
        let mut skl: SkipList<u32, u32> = SkipList::with_options(opts()).unwrap();
        skl.insert(1, 1);
        let err = skl.decode_into("2:2\nthree:3\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        assert!(err.to_string().contains("invalid key"), "{}", err);
        assert_eq!(skl.size(), 1);
        assert_eq!(skl.search(&1), Some(&1));
    }

    #[test]
    fn test_split_record() {
        assert_eq!(split_record("k:v"), Ok(("k".to_string(), "v".to_string())));
        assert_eq!(split_record(":"), Ok((String::new(), String::new())));
        assert_eq!(split_record("a\\:b:c"), Ok(("a:b".to_string(), "c".to_string())));
        assert!(split_record("").is_err());
        assert!(split_record("a::").is_err());
        assert_eq!(split_record("a:1\r"), Err("unescaped carriage return"));
        assert_eq!(split_record("a:1\\r"), Ok(("a".to_string(), "1\r".to_string())));
    }
}
