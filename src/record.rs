use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldKey(Cow<'static, str>);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_owned()))
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        self.0.as_ref()
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_ref())
    }
}

// Absent key means "not yet entered"; an empty string is a present value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawRecord(BTreeMap<FieldKey, String>);

impl RawRecord {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(
        &mut self,
        key: impl Into<FieldKey>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.0.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn merged(&self, key: impl Into<FieldKey>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.insert(key, value);
        next
    }

    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim)
    }

    pub fn get_decimal(&self, key: &str) -> Option<Result<Decimal, rust_decimal::Error>> {
        self.get_trimmed(key).map(str::parse)
    }
}

impl FromIterator<(FieldKey, String)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(FieldKey, String)> for RawRecord {
    fn extend<I: IntoIterator<Item = (FieldKey, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for RawRecord {
    type Item = (FieldKey, String);
    type IntoIter = btree_map::IntoIter<FieldKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
