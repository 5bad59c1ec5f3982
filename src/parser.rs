//! A read-only cursor over a certificate byte slice.
//!
//! [`Parser`] exposes both a raw (untrusted) view and, once [`crate::attest::attest`] succeeds,
//! a trimmed attested (trusted) view: all iteration and lookup methods only ever see
//! `cert[0..attested_length]`, and `attested_length` starts out equal to the full slice length
//! until attestation trims it.

#[cfg(feature = "alloc")]
use log::trace;
use crate::crypto::CryptoVerifier;
use crate::error::{Error, Result};
use crate::field::{self, Field};
use crate::options::{ParseMode, ParseOptions};
use crate::resolver::{
    ArtifactStateResolver, CertificateView, ContractResolver, EntityKeyResolver,
    TransactionResolver, ALWAYS_FAIL_RESOLVERS,
};
use uuid::Uuid;

/// The crypto suite and four resolver capabilities a [`Parser`] is constructed with, plus
/// auxiliary parsing configuration.
#[derive(Clone, Copy)]
pub struct ParserOptions<'s> {
    pub(crate) crypto: &'s dyn CryptoVerifier,
    pub(crate) entity_key_resolver: &'s dyn EntityKeyResolver,
    pub(crate) transaction_resolver: &'s dyn TransactionResolver,
    pub(crate) artifact_state_resolver: &'s dyn ArtifactStateResolver,
    pub(crate) contract_resolver: &'s dyn ContractResolver,
    pub parse_options: ParseOptions,
}

impl<'s> ParserOptions<'s> {
    /// Creates full parser options with every collaborator supplied explicitly.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        crypto: &'s dyn CryptoVerifier,
        entity_key_resolver: &'s dyn EntityKeyResolver,
        transaction_resolver: &'s dyn TransactionResolver,
        artifact_state_resolver: &'s dyn ArtifactStateResolver,
        contract_resolver: &'s dyn ContractResolver,
    ) -> Self {
        ParserOptions {
            crypto,
            entity_key_resolver,
            transaction_resolver,
            artifact_state_resolver,
            contract_resolver,
            parse_options: ParseOptions::new(),
        }
    }

    /// Creates options suitable for parse-only use: every resolver always reports "not found",
    /// so [`crate::attest::attest`] will fail deterministically at the key-resolution step. Use
    /// this when a caller only wants `field_first`/`find_short`/etc. over an untrusted
    /// certificate and will never call `attest`.
    pub fn parse_only(crypto: &'s dyn CryptoVerifier) -> Self {
        ParserOptions {
            crypto,
            entity_key_resolver: &ALWAYS_FAIL_RESOLVERS,
            transaction_resolver: &ALWAYS_FAIL_RESOLVERS,
            artifact_state_resolver: &ALWAYS_FAIL_RESOLVERS,
            contract_resolver: &ALWAYS_FAIL_RESOLVERS,
            parse_options: ParseOptions::new(),
        }
    }

    /// Sets the parse mode, builder-style.
    pub fn with_parse_mode(mut self, parse_mode: crate::options::ParseMode) -> Self {
        self.parse_options.parse_mode = parse_mode;
        self
    }
}

/// A read-only cursor over a single certificate.
pub struct Parser<'a, 's> {
    cert: &'a [u8],
    opts: ParserOptions<'s>,
    raw_length: usize,
    attested_length: usize,
    /// Reserved for a future chain-walking wrapper; see the design notes on recursive
    /// parent-parser chains. Always `None` in the resolver-based design this crate implements.
    _parent: Option<()>,
}

impl<'a, 's> Parser<'a, 's> {
    /// Constructs a parser over `cert`. Fails with [`Error::ParserInitInvalidArg`] if `cert` is
    /// empty.
    pub fn new(opts: ParserOptions<'s>, cert: &'a [u8]) -> Result<Self> {
        if cert.is_empty() {
            return Err(Error::ParserInitInvalidArg);
        }
        Ok(Parser {
            cert,
            opts,
            raw_length: cert.len(),
            attested_length: cert.len(),
            _parent: None,
        })
    }

    /// The crypto suite this parser was constructed with.
    pub(crate) fn crypto(&self) -> &'s dyn CryptoVerifier {
        self.opts.crypto
    }

    pub(crate) fn entity_key_resolver(&self) -> &'s dyn EntityKeyResolver {
        self.opts.entity_key_resolver
    }

    pub(crate) fn contract_resolver(&self) -> &'s dyn ContractResolver {
        self.opts.contract_resolver
    }

    #[allow(dead_code)]
    pub(crate) fn transaction_resolver(&self) -> &'s dyn TransactionResolver {
        self.opts.transaction_resolver
    }

    #[allow(dead_code)]
    pub(crate) fn artifact_state_resolver(&self) -> &'s dyn ArtifactStateResolver {
        self.opts.artifact_state_resolver
    }

    /// The full, untrusted length of the underlying certificate slice.
    pub fn raw_length(&self) -> usize {
        self.raw_length
    }

    /// The length of the currently-trusted prefix. Equal to [`Parser::raw_length`] until
    /// [`crate::attest::attest`] succeeds and trims it.
    pub fn attested_length(&self) -> usize {
        self.attested_length
    }

    /// Resets the attested view back to the full raw certificate. Called by `attest` as its
    /// first step, so a re-verification always starts from the same state.
    pub(crate) fn reset_attestation(&mut self) {
        self.attested_length = self.raw_length;
    }

    pub(crate) fn set_attested_length(&mut self, len: usize) {
        self.attested_length = len;
    }

    fn trusted(&self) -> &'a [u8] {
        &self.cert[..self.attested_length]
    }

    /// The full, untrusted certificate slice, independent of the current attested trim.
    pub(crate) fn raw_slice(&self) -> &'a [u8] {
        self.cert
    }

    /// The parse mode (`Strict`/`Permissive`) this parser was configured with.
    pub(crate) fn parse_mode(&self) -> ParseMode {
        self.opts.parse_options.parse_mode
    }

    /// The first field in the attested view.
    pub fn field_first(&self) -> Result<Field<'a>> {
        #[cfg(feature = "alloc")]
        trace!("field_first: parsing at offset 0 of {} attested bytes", self.attested_length);
        let (f, _next) = field::parse_field(self.trusted(), 0)?;
        Ok(f)
    }

    /// The field immediately following `prev` in the attested view.
    pub fn field_next(&self, prev: &Field<'a>) -> Result<Field<'a>> {
        let cert = self.trusted();
        let next_offset = prev.next_offset();
        if next_offset >= cert.len() {
            #[cfg(feature = "alloc")]
            trace!("field_next: offset {} reached end of attested view", next_offset);
            return Err(Error::FieldNotFound);
        }
        #[cfg(feature = "alloc")]
        trace!("field_next: parsing at offset {}", next_offset);
        let (f, _next) = field::parse_field(cert, next_offset)?;
        Ok(f)
    }

    /// Linear scan from the start of the attested view for the first field of type
    /// `wanted_type`.
    pub fn find_short(&self, wanted_type: u16) -> Result<Field<'a>> {
        #[cfg(feature = "alloc")]
        trace!("find_short: scanning for field type 0x{:04x}", wanted_type);
        let mut field = self.field_first()?;
        loop {
            if field.field_type == wanted_type {
                #[cfg(feature = "alloc")]
                trace!("find_short: found type 0x{:04x} at offset {}", wanted_type, field.offset);
                return Ok(field);
            }
            field = self.field_next(&field)?;
        }
    }

    /// Scans forward from `current`, parsing one candidate field at a time, for the next field
    /// sharing `current`'s type.
    ///
    /// `current`'s type is read directly from the already-parsed `Field` — there is no re-parse
    /// of the current record, which is what lets this avoid the off-by-one a naive
    /// parse-then-search loop can fall into (see the design notes on `find_next`).
    pub fn find_next(&self, current: &Field<'a>) -> Result<Field<'a>> {
        let wanted_type = current.field_type;
        #[cfg(feature = "alloc")]
        trace!(
            "find_next: scanning for another field of type 0x{:04x} after offset {}",
            wanted_type,
            current.offset
        );
        let mut field = self.field_next(current).map_err(|e| match e {
            Error::FieldNotFound => Error::FindNextFieldNotFound,
            other => other,
        })?;
        loop {
            if field.field_type == wanted_type {
                #[cfg(feature = "alloc")]
                trace!("find_next: found type 0x{:04x} at offset {}", wanted_type, field.offset);
                return Ok(field);
            }
            field = self.field_next(&field).map_err(|e| match e {
                Error::FieldNotFound => Error::FindNextFieldNotFound,
                other => other,
            })?;
        }
    }

    /// Reserved for long-code (128-bit UUID) field identifiers if the wire format is ever
    /// extended. The current wire format only has 16-bit short codes, so this narrows
    /// `long_code` to its low 16 bits and delegates to [`Parser::find_short`] — a placeholder
    /// adapter, not an independent lookup.
    pub fn find(&self, long_code: Uuid) -> Result<Field<'a>> {
        let bytes = long_code.as_bytes();
        let short_code = u16::from_be_bytes([bytes[14], bytes[15]]);
        self.find_short(short_code)
    }
}

impl<'a, 's> CertificateView for Parser<'a, 's> {
    fn raw_length(&self) -> usize {
        Parser::raw_length(self)
    }

    fn attested_length(&self) -> usize {
        Parser::attested_length(self)
    }

    fn field_first(&self) -> Result<Field<'_>> {
        Parser::field_first(self)
    }

    fn field_next<'p>(&'p self, prev: &Field<'p>) -> Result<Field<'p>> {
        Parser::field_next(self, prev)
    }

    fn find_short(&self, wanted_type: u16) -> Result<Field<'_>> {
        Parser::find_short(self, wanted_type)
    }

    fn find_next<'p>(&'p self, current: &Field<'p>) -> Result<Field<'p>> {
        Parser::find_next(self, current)
    }

    fn find(&self, long_code: Uuid) -> Result<Field<'_>> {
        Parser::find(self, long_code)
    }
}
