//! The cryptographic suite collaborator.
//!
//! The core calls into caller-supplied signing/verification capabilities for everything
//! signature-shaped: it never implements a signature algorithm itself. This mirrors the
//! [`crate::resolver`] collaborators — all are capability traits the core is written against,
//! not concrete implementations.
//!
//! The capability is split into [`CryptoSigner`] (used by [`crate::builder::Builder`], which
//! holds a concrete private key type supplied directly by its caller) and [`CryptoVerifier`]
//! (used by [`crate::attest`], which only ever has an opaque public-key byte buffer resolved at
//! runtime by an [`crate::resolver::EntityKeyResolver`]). Keeping them separate means a
//! `CryptoVerifier` can be stored as a trait object without a generic private-key parameter
//! getting in the way.

use alloc::vec::Vec;

use crate::error::Result;

/// Produces signatures. Implemented against a concrete private-key type, since the caller of
/// [`crate::builder::Builder::sign`] always has one in hand directly.
pub trait CryptoSigner {
    /// The private key type accepted by [`CryptoSigner::sign`].
    type PrivateKey: ?Sized;

    /// The exact byte length of a signature produced by this suite.
    fn signature_size(&self) -> usize;

    /// Signs `message`, returning exactly [`CryptoSigner::signature_size`] bytes.
    fn sign(&self, message: &[u8], private_key: &Self::PrivateKey) -> Result<Vec<u8>>;
}

/// Checks signatures against an opaque public-key buffer. Object-safe, so it can live behind a
/// `dyn` reference in [`crate::parser::ParserOptions`] alongside the resolver trait objects.
pub trait CryptoVerifier {
    /// The exact byte length of a signature this suite expects.
    fn signature_size(&self) -> usize;

    /// Verifies that `signature` is a valid signature over `message` under `public_key`.
    ///
    /// Returns `Ok(true)`/`Ok(false)` for a completed check; `Err` is reserved for suite-internal
    /// failures (malformed key material) rather than "signature did not match", which is a plain
    /// `Ok(false)`.
    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool>;
}
