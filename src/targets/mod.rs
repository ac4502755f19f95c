//! Target specifications: parsing, request construction and ordering.
//!
//! A target file holds one request per line:
//!
//! ```text
//! METHOD [Header:Value ...] URL [FILESPEC]
//! ```
//!
//! Blank lines and lines starting with `//` are skipped. See
//! [`Target::request`] for how the optional file spec shapes the request body.
mod header;
mod parse;
mod request;


use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub use header::Header;
pub(crate) use request::DEFAULT_USER_AGENT;

/// One request descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub method: String,
    pub url: String,
    /// Default payload used when no file spec overrides it.
    pub body: Vec<u8>,
    /// Raw file spec token (`form:...`, `md5:...`, or a path). Empty when absent.
    pub file_spec: String,
    pub header: Header,
}

/// Ordered target set, consumed round-robin by the attack strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets(Vec<Target>);

impl Targets {
    #[must_use]
    pub const fn new(targets: Vec<Target>) -> Self {
        Self(targets)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Target> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Target] {
        &self.0
    }

    /// Permutes the targets in place.
    ///
    /// The generator is seeded locally, so the same seed always yields the
    /// same order for the same input, whatever else ran before.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        self.0.shuffle(&mut rng);
    }
}

impl From<Vec<Target>> for Targets {
    fn from(targets: Vec<Target>) -> Self {
        Self(targets)
    }
}

impl<'targets> IntoIterator for &'targets Targets {
    type Item = &'targets Target;
    type IntoIter = std::slice::Iter<'targets, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
