//! `blockcert` is a binary certificate format, builder, parser, and recursive attestation engine
//! for distributed-ledger transaction certificates.
//!
//! A certificate is a flat sequence of `(type, size, value)` field records (see [`field`])
//! terminated by a `SIGNER_ID`/`SIGNATURE` footer. [`builder::Builder`] produces one;
//! [`parser::Parser`] reads one back and, via [`attest::attest`], verifies it against a
//! caller-supplied [`crypto::CryptoVerifier`] and [`resolver`] implementation.
//!
//! The crate does not implement any cryptography or persistence itself — both are external
//! collaborators the attestation engine calls through traits, so this crate stays a passive,
//! dependency-light format library.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod attest;
pub mod builder;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod field;
pub mod mapping;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod version;

pub use attest::attest;
pub use builder::{Builder, BuilderOptions};
pub use error::{Error, Result};
pub use field::Field;
pub use parser::{Parser, ParserOptions};
