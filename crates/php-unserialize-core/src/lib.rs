//! Decoder for PHP's `serialize()` wire format.
//!
//! This crate parses the compact, length-prefixed text format produced by
//! PHP's native `serialize()` into a dynamically-typed [`Value`] tree. It is
//! unserialize-only: there is no encoding direction.
//!
//! # Features
//!
//! - **Single-pass decoding** - One cursor, no backtracking
//! - **Raw byte strings** - Payloads keep their exact bytes, including
//!   embedded NULs and non-UTF8 data
//! - **Array shape detection** - PHP arrays with consecutive `0..n` integer
//!   keys come back as sequences, everything else as insertion-ordered
//!   mappings
//! - **Object flattening** - `O:...` payloads decode like arrays; the class
//!   name is validated and discarded
//! - **Detailed errors** - Precise error positions and input previews
//!
//! # Quick Start
//!
//! ```rust
//! use php_unserialize_core::{decode, Value};
//!
//! let data = br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#;
//! let value = decode(data).unwrap().unwrap();
//!
//! let array = value.as_array().unwrap();
//! assert_eq!(
//!     array.get(&Value::from("age")).unwrap().as_int().unwrap(),
//!     30,
//! );
//! ```
//!
//! An empty buffer is not an error; `decode` returns `Ok(None)`:
//!
//! ```rust
//! use php_unserialize_core::decode;
//!
//! assert_eq!(decode(b"").unwrap(), None);
//! ```
//!
//! # Supported Productions
//!
//! | Wire form | Result |
//! |-----------|--------|
//! | `N;` | [`Value::Null`] |
//! | `b:0;` / `b:1;` | [`Value::Bool`] |
//! | `i:<digits>;` | [`Value::Int`] |
//! | `d:<decimal>;` | [`Value::Float`] |
//! | `s:<len>:"<bytes>";` | [`Value::String`] |
//! | `a:<count>:{...}` | [`Value::Array`] |
//! | `O:<len>:"<class>":<count>:{...}` | [`Value::Array`] (class discarded) |

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::inline_always)]

pub mod decoder;
pub mod error;
pub mod types;

#[cfg(feature = "serde")]
pub mod json;

pub use decoder::{decode, decode_with_config, Decoder, DecoderConfig};
pub use error::{ErrorKind, Result, UnserializeError};
pub use types::{ArrayKind, ArrayValue, Kind, Value};

#[cfg(feature = "serde")]
pub use json::to_json;
