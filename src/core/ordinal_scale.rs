use indexmap::IndexSet;

use crate::error::{DashboardError, DashboardResult};

/// Categorical mapping from keys to a cyclic output range.
///
/// Keys outside the initial domain are appended in order of first appearance
/// by [`OrdinalScale::extend`], and like every key they take the range value
/// at `index % range.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<T> {
    domain: IndexSet<String>,
    range: Vec<T>,
}

impl<T> OrdinalScale<T> {
    pub fn new<I>(domain: I, range: Vec<T>) -> DashboardResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if range.is_empty() {
            return Err(DashboardError::InvalidData(
                "ordinal scale range must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            domain: domain.into_iter().map(Into::into).collect(),
            range,
        })
    }

    /// Adds `key` to the domain when it is not there yet.
    pub fn extend(&mut self, key: &str) {
        if !self.domain.contains(key) {
            self.domain.insert(key.to_owned());
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        let index = self.domain.get_index_of(key)?;
        self.range.get(index % self.range.len())
    }

    #[must_use]
    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }
}
