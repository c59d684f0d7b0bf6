use crate::{SkipList, SkipListOptions};

pub(crate) const KEYS: [&str; 26] = [
    "aba", "abb", "abc", "abd", "abe", "abf", "abg", "abh", "abi", "abj", "abk", "abl", "abm",
    "abn", "abo", "abp", "abq", "abr", "abs", "abt", "abu", "abv", "abw", "abx", "aby", "abz",
];

/// Every key of [`KEYS`] mapped to its upper case form, inserted in reverse.
pub(crate) fn make_skiplist() -> SkipList<String, String> {
    let opts = SkipListOptions::default().with_seed(0xdeadbeef);
    let mut skl = SkipList::with_options(opts).unwrap();
    for k in KEYS.iter().rev() {
        skl.insert(k.to_string(), k.to_uppercase());
    }
    skl
}

/// key1..key3 inserted, key2 deleted, key1 overwritten.
pub(crate) fn scenario_list() -> SkipList<String, String> {
    let opts = SkipListOptions::default().with_max_level(6).with_seed(1);
    let mut skl = SkipList::with_options(opts).unwrap();
    for (k, v) in [("key1", "value1"), ("key2", "value2"), ("key3", "value3")] {
        skl.insert(k.to_string(), v.to_string());
    }
    skl.delete("key2");
    skl.insert("key1".to_string(), "updatedValue1".to_string());
    skl
}
