//! Random history generation for `isocheck`.
//!
//! Produces list-append histories that honor the checker's input
//! preconditions (every value appended at most once per key, reads
//! observing prefixes of the key's final sequence) while still exhibiting
//! stale reads -- the raw material of anti-dependency cycles. Generation
//! is fully seeded; the same parameters reproduce the same history.

pub mod generator;
