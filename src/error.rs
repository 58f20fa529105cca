use thiserror::Error;

/// Errors returned by fallible [`OrderedMap`](crate::OrderedMap) operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key is not present in the map.
    #[error("key not found")]
    KeyNotFound,

    /// The key is already present and the operation does not overwrite.
    #[error("key already present in map")]
    DuplicateKey,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(Error::DuplicateKey.to_string(), "key already present in map");
    }
}
