//! The Resolver Interface: four caller-supplied capabilities the attestation engine calls into.
//!
//! The core invokes these but never implements them — it assumes nothing about whether a
//! resolver performs I/O, blocks, or is pure, only that it is re-entrant with respect to the
//! parser (a contract may itself construct a fresh [`crate::parser::Parser`]).
//!
//! All four traits take a [`CertificateView`] rather than a concrete `Parser<C>` so that a
//! resolver implementation is not coupled to any particular crypto suite type parameter.

use alloc::boxed::Box;
use alloc::vec::Vec;
use uuid::Uuid;

use crate::error::Result;
use crate::field::Field;

/// The read-only surface of a [`crate::parser::Parser`] that resolvers and contract closures are
/// given access to.
pub trait CertificateView {
    /// Length of the full, untrusted certificate slice.
    fn raw_length(&self) -> usize;
    /// Length of the currently-trusted prefix (equal to `raw_length` until `attest` trims it).
    fn attested_length(&self) -> usize;
    /// The first field in the attested view.
    fn field_first(&self) -> Result<Field<'_>>;
    /// The field immediately following `prev` in the attested view.
    fn field_next<'s>(&'s self, prev: &Field<'s>) -> Result<Field<'s>>;
    /// The first field of type `wanted_type` in the attested view.
    fn find_short(&self, wanted_type: u16) -> Result<Field<'_>>;
    /// The next field sharing `current`'s type, scanning forward from `current`.
    fn find_next<'s>(&'s self, current: &Field<'s>) -> Result<Field<'s>>;
    /// Reserved long-code lookup; see [`crate::parser::Parser::find`].
    fn find(&self, long_code: Uuid) -> Result<Field<'_>>;
}

/// Resolves the signing/encryption public keys in force for an entity at a given block height.
pub trait EntityKeyResolver {
    /// Returns `(public_encryption_key, public_signing_key)` for `entity_uuid` at `height`, or
    /// `Ok(None)` if no keys were in force (attestation cannot proceed).
    fn resolve(
        &self,
        parser: &dyn CertificateView,
        height: u64,
        entity_uuid: Uuid,
    ) -> Result<Option<(Vec<u8>, Vec<u8>)>>;
}

/// Resolves a (possibly historical) transaction certificate for an artifact.
pub trait TransactionResolver {
    /// Returns `(certificate_bytes, already_trusted)` for `artifact_uuid`, optionally pinned to a
    /// specific `txn_uuid`, or `Ok(None)` if none exists. `already_trusted` must only be `true`
    /// for certificates the caller has itself already attested.
    fn resolve(
        &self,
        parser: &dyn CertificateView,
        artifact_uuid: Uuid,
        txn_uuid: Option<Uuid>,
    ) -> Result<Option<(Vec<u8>, bool)>>;
}

/// Resolves the current recorded state of an artifact.
pub trait ArtifactStateResolver {
    /// Returns `(state, last_txn_uuid)`; `state` of `None` means unknown.
    fn resolve(
        &self,
        parser: &dyn CertificateView,
        artifact_uuid: Uuid,
    ) -> Result<(Option<i32>, Option<Uuid>)>;
}

/// A domain-specific predicate over a transaction certificate, returned by a
/// [`ContractResolver`].
pub trait ContractClosure {
    /// Evaluates the contract against `parser`, returning `true` if it accepts the certificate.
    fn verify(&self, parser: &dyn CertificateView) -> Result<bool>;
}

/// The outcome of resolving a transaction-type/artifact pair to a contract.
pub enum ContractOutcome {
    /// No contract is registered for this transaction type / artifact pair.
    NoMapping,
    /// A contract closure was found and is ready to be invoked.
    Found(Box<dyn ContractClosure>),
}

/// Resolves the contract closure that governs a given transaction type for a given artifact.
pub trait ContractResolver {
    fn resolve(
        &self,
        parser: &dyn CertificateView,
        txn_type_uuid: Uuid,
        artifact_uuid: Uuid,
    ) -> Result<ContractOutcome>;
}

/// The default "always fail" implementation of all four resolver traits, for parse-only use —
/// i.e. when a caller wants [`crate::parser::Parser::field_first`]/`find_short`/etc. but will
/// never call [`crate::attest::attest`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysFailResolvers;

impl EntityKeyResolver for AlwaysFailResolvers {
    fn resolve(
        &self,
        _parser: &dyn CertificateView,
        _height: u64,
        _entity_uuid: Uuid,
    ) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
        Ok(None)
    }
}

impl TransactionResolver for AlwaysFailResolvers {
    fn resolve(
        &self,
        _parser: &dyn CertificateView,
        _artifact_uuid: Uuid,
        _txn_uuid: Option<Uuid>,
    ) -> Result<Option<(Vec<u8>, bool)>> {
        Ok(None)
    }
}

impl ArtifactStateResolver for AlwaysFailResolvers {
    fn resolve(
        &self,
        _parser: &dyn CertificateView,
        _artifact_uuid: Uuid,
    ) -> Result<(Option<i32>, Option<Uuid>)> {
        Ok((None, None))
    }
}

impl ContractResolver for AlwaysFailResolvers {
    fn resolve(
        &self,
        _parser: &dyn CertificateView,
        _txn_type_uuid: Uuid,
        _artifact_uuid: Uuid,
    ) -> Result<ContractOutcome> {
        Ok(ContractOutcome::NoMapping)
    }
}

/// A single shared instance of [`AlwaysFailResolvers`], usable as a `'static` trait object for
/// any of the four resolver traits. Backs [`crate::parser::ParserOptions::parse_only`].
pub static ALWAYS_FAIL_RESOLVERS: AlwaysFailResolvers = AlwaysFailResolvers;
