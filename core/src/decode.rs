//! JSON response decoding.
//!
//! Delete-style endpoints answer with an empty body, so "nothing to decode"
//! leaves the caller's container untouched instead of failing.

use serde::de::DeserializeOwned;

/// Decode the first JSON value in `body` into `out`.
///
/// An empty or whitespace-only body is not an error and leaves `out`
/// unmodified. Bytes after the first complete value are ignored.
pub fn decode<T: DeserializeOwned>(body: &[u8], out: &mut T) -> Result<(), serde_json::Error> {
    match serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
        None => Ok(()),
        Some(Ok(value)) => {
            *out = value;
            Ok(())
        }
        Some(Err(e)) => Err(e),
    }
}
