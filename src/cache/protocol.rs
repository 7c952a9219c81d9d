//! Caching protocols built on fetch/store
//!
//! | Protocol | Generator input | Accepted decisions |
//! |----------|-----------------|--------------------|
//! | `cached` | nothing, runs on miss only | `Cache`, `Ignore` |
//! | `cached_ok` | nothing, runs on miss only | any `Result`; only `Ok` is kept |
//! | `with_cache` | stored value or default, runs every call | `Cache`, `Ignore`, `PartialCache` |

use super::handle::Memo;
use super::store::{decode_value, encode_value, Lookup};
use crate::error::{MemoError, MemoResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a generator wants done with its output
///
/// `T` is the value handed back to the caller. `S` is the value persisted by
/// `PartialCache`, which only `with_cache` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision<T, S = T> {
    /// Persist the value and return it
    Cache(T),
    /// Return the value without persisting it
    Ignore(T),
    /// Persist `store`, return `value`
    PartialCache { store: S, value: T },
}

impl<T, S> Decision<T, S> {
    /// Name of the variant, for logs
    fn kind(&self) -> &'static str {
        match self {
            Self::Cache(_) => "cache",
            Self::Ignore(_) => "ignore",
            Self::PartialCache { .. } => "partial-cache",
        }
    }
}

impl<T: Serialize, S: Serialize> Decision<T, S> {
    /// Render the decision for error messages
    fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<{} decision: {}>", self.kind(), e))
    }
}

/// Stored shape of a successful `cached_ok` result
///
/// Serializes exactly like `Result::Ok`, while the error side never touches
/// serde so `E` needs no serde impls.
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
enum Outcome<T, E> {
    Ok(T),
    #[serde(skip)]
    Err(E),
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(e) => Err(e),
        }
    }
}

impl Memo {
    /// Return the cached value for `key`, or run `generator` and apply its decision
    ///
    /// The generator runs at most once, and only on a miss. It may answer
    /// `Cache` or `Ignore`; `PartialCache` is rejected with
    /// [`MemoError::ProtocolViolation`] and nothing is written.
    pub fn cached<K, T, F>(&self, key: &K, generator: F) -> MemoResult<T>
    where
        K: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Decision<T>,
    {
        if let Lookup::Hit(value) = self.fetch(key)? {
            return Ok(value);
        }

        match generator() {
            Decision::Cache(value) => {
                self.store(key, &value)?;
                Ok(value)
            }
            Decision::Ignore(value) => {
                debug!("Generator declined caching");
                Ok(value)
            }
            decision @ Decision::PartialCache { .. } => {
                Err(MemoError::protocol("cached", decision.describe()))
            }
        }
    }

    /// Like [`Memo::cached`] for fallible generators: only `Ok` results are stored
    ///
    /// Errors are returned to the caller and recomputed on the next call.
    /// The entry is stored as `Result::Ok(value)`, readable as any
    /// `Result<T, _>`.
    pub fn cached_ok<K, T, E, F>(&self, key: &K, generator: F) -> MemoResult<Result<T, E>>
    where
        K: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T, E>,
    {
        let outcome = self.cached(key, || match generator() {
            Ok(value) => Decision::Cache(Outcome::Ok(value)),
            Err(e) => Decision::Ignore(Outcome::Err(e)),
        })?;

        Ok(outcome.into())
    }

    /// Accumulator protocol: `callback` always runs, fed the stored value or `default`
    ///
    /// - `Cache(v)` stores `v` and returns it. `v` must read back as `S`,
    ///   otherwise the call fails with [`MemoError::ProtocolViolation`].
    /// - `Ignore(v)` returns `v` and leaves any stored value untouched.
    /// - `PartialCache { store, value }` stores `store` and returns `value`.
    ///   The next call's callback receives `store`.
    pub fn with_cache<K, S, T, F>(&self, key: &K, default: S, callback: F) -> MemoResult<T>
    where
        K: Serialize + ?Sized,
        S: Serialize + DeserializeOwned,
        T: Serialize,
        F: FnOnce(S) -> Decision<T, S>,
    {
        let current = match self.fetch(key)? {
            Lookup::Hit(stored) => stored,
            Lookup::Miss => default,
        };

        self.apply_accumulated(key, callback(current))
    }

    /// [`Memo::with_cache`] without a default: the callback sees `None` on a miss
    pub fn with_cache_optional<K, S, T, F>(&self, key: &K, callback: F) -> MemoResult<T>
    where
        K: Serialize + ?Sized,
        S: Serialize + DeserializeOwned,
        T: Serialize,
        F: FnOnce(Option<S>) -> Decision<T, S>,
    {
        let current = self.fetch(key)?.into_option();
        self.apply_accumulated(key, callback(current))
    }

    fn apply_accumulated<K, S, T>(&self, key: &K, decision: Decision<T, S>) -> MemoResult<T>
    where
        K: Serialize + ?Sized,
        S: Serialize + DeserializeOwned,
        T: Serialize,
    {
        match decision {
            Decision::Cache(value) => {
                let content = encode_value(&value)?;
                if decode_value::<S>(&content).is_err() {
                    let decision: Decision<T, S> = Decision::Cache(value);
                    return Err(MemoError::protocol("with_cache", decision.describe()));
                }
                self.store_encoded(key, &content)?;
                Ok(value)
            }
            Decision::Ignore(value) => {
                debug!("Callback declined caching");
                Ok(value)
            }
            Decision::PartialCache { store, value } => {
                self.store(key, &store)?;
                Ok(value)
            }
        }
    }
}
