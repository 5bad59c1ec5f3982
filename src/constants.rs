//! Well-known field-type short codes reserved by the core.
//!
//! All other 16-bit codes are application-defined. The numeric assignments below are an
//! arbitrary but stable choice; only their uniqueness and the `SIGNER_ID`/`SIGNATURE` ordering
//! contract in [`crate::builder`]/[`crate::attest`] are load-bearing.

/// The certificate format's version, e.g. `0x0001_0000`.
pub const CERTIFICATE_VERSION: u16 = 0x0001;
/// Unix timestamp the certificate becomes valid from.
pub const CERTIFICATE_VALID_FROM: u16 = 0x0002;
/// Identifies which crypto suite produced the `SIGNATURE` field.
pub const CERTIFICATE_CRYPTO_SUITE: u16 = 0x0003;
/// Application-defined certificate type UUID.
pub const CERTIFICATE_TYPE: u16 = 0x0004;
/// This certificate's own id.
pub const CERTIFICATE_ID: u16 = 0x0005;
/// The id of the certificate this one supersedes, if any.
pub const PREVIOUS_CERTIFICATE_ID: u16 = 0x0006;
/// Application-defined transaction-type UUID, consulted by the contract resolver.
pub const TRANSACTION_TYPE: u16 = 0x0007;
/// Application-defined artifact-type UUID.
pub const ARTIFACT_TYPE: u16 = 0x0008;
/// The artifact this certificate records a state transition for.
pub const ARTIFACT_ID: u16 = 0x0009;
/// The artifact's state prior to this certificate's transaction.
pub const PREVIOUS_ARTIFACT_STATE: u16 = 0x000A;
/// The artifact's state after this certificate's transaction.
pub const NEW_ARTIFACT_STATE: u16 = 0x000B;
/// The 16-byte UUID of the entity that signed this certificate. Always the second-to-last field.
pub const SIGNER_ID: u16 = 0x000C;
/// The signature bytes covering everything up to and including this field's header. Always the
/// last field.
pub const SIGNATURE: u16 = 0x000D;
/// The signer's public signing key, when carried inline rather than resolved externally.
pub const PUBLIC_SIGNING_KEY: u16 = 0x000E;

/// Size in bytes of a `SIGNER_ID` field's value.
pub const SIGNER_ID_SIZE: usize = 16;
