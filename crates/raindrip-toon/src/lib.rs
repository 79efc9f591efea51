//! # raindrip-toon
//!
//! Encoder and decoder for **TOON (Token-Oriented Object Notation)**, the
//! compact tabular serialization the `raindrip` CLI emits by default.
//!
//! TOON reduces token consumption relative to JSON when structured data is
//! read by language models: nesting is expressed with indentation instead
//! of braces, uniform arrays of records collapse into a header plus one
//! row per record, and strings are quoted only when ambiguous.
//!
//! ## Quick start
//!
//! ```rust
//! use raindrip_toon::{decode, encode};
//! use serde_json::json;
//!
//! let value = json!({"name": "Alice", "scores": [95, 87, 92]});
//! let toon = encode(&value).unwrap();
//! assert_eq!(toon, "name: Alice\nscores[3]: 95,87,92");
//!
//! // Round-trip back to the same value.
//! assert_eq!(decode(&toon).unwrap(), value);
//! ```
//!
//! Uniform arrays of records are the headline case:
//!
//! ```rust
//! use raindrip_toon::encode;
//! use serde_json::json;
//!
//! let collections = json!([
//!     {"id": 1, "name": "Work"},
//!     {"id": 2, "name": "Research"},
//! ]);
//! assert_eq!(
//!     encode(&collections).unwrap(),
//!     "[2]{id,name}:\n  1,Work\n  2,Research"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — JSON value → TOON text
//! - [`decoder`] — TOON text → JSON value, with strict count and
//!   indentation validation
//! - [`error`] — [`EncodeError`] and [`ParseError`]

pub mod decoder;
pub mod encoder;
pub mod error;
mod lexeme;

pub use decoder::decode;
pub use encoder::encode;
pub use error::{EncodeError, ParseError};
