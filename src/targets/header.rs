use std::collections::BTreeMap;

/// Multi-valued header set keyed by canonical header name.
///
/// Cloning produces independent storage, so every target and every built
/// request owns its own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header(BTreeMap<String, Vec<String>>);

impl Header {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every value of `key` with `value`.
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(canonical_key(key), vec![value.to_owned()]);
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: &str, value: &str) {
        self.0
            .entry(canonical_key(key))
            .or_default()
            .push(value.to_owned());
    }

    /// First value of `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(&canonical_key(key))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.0
            .get(&canonical_key(key))
            .map_or(&[], |values| values.as_slice())
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(&canonical_key(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for Header
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Self::new();
        for (key, value) in iter {
            header.add(key.as_ref(), value.as_ref());
        }
        header
    }
}

/// `content-type` becomes `Content-Type`, `x_foo` becomes `X_foo`. Keys
/// holding anything outside the HTTP token alphabet are kept verbatim.
fn canonical_key(key: &str) -> String {
    if key.is_empty() || !key.chars().all(is_token_char) {
        return key.to_owned();
    }
    let mut canonical = String::with_capacity(key.len());
    let mut upper = true;
    for ch in key.chars() {
        if upper {
            canonical.push(ch.to_ascii_uppercase());
        } else {
            canonical.push(ch.to_ascii_lowercase());
        }
        upper = ch == '-';
    }
    canonical
}

fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(ch)
}
