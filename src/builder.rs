//! Appends strongly-typed fields to a bounded output buffer, then signs it.
//!
//! A [`Builder`] owns a `Vec<u8>` capped at a caller-chosen `max_size`. Every `add_*` method
//! appends one field record; [`Builder::sign`] appends the terminal `SIGNER_ID`/`SIGNATURE`
//! footer; [`Builder::emit`] hands back a borrowed view of the finished bytes.

use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use log::debug;
use uuid::Uuid;

use crate::crypto::CryptoSigner;
use crate::error::{Error, Result};
use crate::constants;
use crate::field::{write_field_header, FIELD_HEADER_SIZE, MAX_FIELD_VALUE_SIZE};

/// Options shared by a [`Builder`]: just the crypto suite used by [`Builder::sign`].
#[derive(Debug, Clone, Copy)]
pub struct BuilderOptions<'s, C: CryptoSigner> {
    /// The crypto suite invoked by [`Builder::sign`].
    pub crypto: &'s C,
}

impl<'s, C: CryptoSigner> BuilderOptions<'s, C> {
    /// Creates builder options around a crypto suite reference.
    pub fn new(crypto: &'s C) -> Self {
        BuilderOptions { crypto }
    }
}

/// Appends fields into a capacity-bounded buffer and finalizes it with a signature.
pub struct Builder<'s, C: CryptoSigner> {
    buf: Vec<u8>,
    offset: usize,
    max_size: usize,
    opts: BuilderOptions<'s, C>,
}

macro_rules! impl_add_int {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Appends a `", stringify!($ty), "` field, big-endian encoded.")]
        pub fn $name(&mut self, field_type: u16, value: $ty) -> Result<()> {
            self.append_field(field_type, &value.to_be_bytes())
        }
    };
}

impl<'s, C: CryptoSigner> Builder<'s, C> {
    /// Creates a new builder with a capped output capacity of `max_size` bytes.
    pub fn new(opts: BuilderOptions<'s, C>, max_size: usize) -> Self {
        Builder {
            buf: Vec::with_capacity(max_size),
            offset: 0,
            max_size,
            opts,
        }
    }

    /// The number of bytes written so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of bytes still available before `max_size` is reached.
    pub fn remaining_capacity(&self) -> usize {
        self.max_size.saturating_sub(self.offset)
    }

    fn append_field(&mut self, field_type: u16, payload: &[u8]) -> Result<()> {
        let record_size = FIELD_HEADER_SIZE + payload.len();
        if record_size > self.remaining_capacity() {
            return Err(Error::AddInvalidArg(
                "insufficient remaining builder capacity",
            ));
        }
        if payload.len() > MAX_FIELD_VALUE_SIZE {
            return Err(Error::AddTooBig(payload.len()));
        }

        let mut header = [0u8; FIELD_HEADER_SIZE];
        write_field_header(&mut header, 0, field_type, payload.len() as u16)?;
        self.buf.extend_from_slice(&header);
        self.buf.extend_from_slice(payload);
        self.offset += record_size;

        #[cfg(feature = "alloc")]
        debug!(
            "appended field type=0x{:04x} size={} new offset={}",
            field_type,
            payload.len(),
            self.offset
        );
        Ok(())
    }

    impl_add_int!(add_int8, i8);
    impl_add_int!(add_uint8, u8);
    impl_add_int!(add_int16, i16);
    impl_add_int!(add_uint16, u16);
    impl_add_int!(add_int32, i32);
    impl_add_int!(add_uint32, u32);
    impl_add_int!(add_int64, i64);
    impl_add_int!(add_uint64, u64);

    /// Appends a verbatim buffer field.
    pub fn add_buffer(&mut self, field_type: u16, value: &[u8]) -> Result<()> {
        self.append_field(field_type, value)
    }

    /// Appends a 16-byte UUID field, written in the UUID's native big-endian byte order.
    pub fn add_uuid(&mut self, field_type: u16, value: Uuid) -> Result<()> {
        self.append_field(field_type, value.as_bytes())
    }

    /// Finalizes the certificate: appends `SIGNER_ID` then a `SIGNATURE` computed over every byte
    /// written so far, including the `SIGNATURE` field's own header.
    pub fn sign(&mut self, signer_id: Uuid, private_key: &C::PrivateKey) -> Result<()> {
        let sig_size = self.opts.crypto.signature_size();
        let footer_size = (FIELD_HEADER_SIZE + constants::SIGNER_ID_SIZE)
            + (FIELD_HEADER_SIZE + sig_size);
        if footer_size > self.remaining_capacity() {
            return Err(Error::SignInvalidFieldSize(
                footer_size,
                self.remaining_capacity(),
            ));
        }

        self.add_uuid(constants::SIGNER_ID, signer_id)?;

        let mut header = [0u8; FIELD_HEADER_SIZE];
        write_field_header(&mut header, 0, constants::SIGNATURE, sig_size as u16)?;
        self.buf.extend_from_slice(&header);
        self.offset += FIELD_HEADER_SIZE;

        let message = &self.buf[0..self.offset];
        let signature = self.opts.crypto.sign(message, private_key)?;
        if signature.len() != sig_size {
            return Err(Error::AttestGeneral(
                "crypto suite produced a signature of unexpected length",
            ));
        }

        self.buf.extend_from_slice(&signature);
        self.offset += signature.len();

        #[cfg(feature = "alloc")]
        debug!("signed certificate, final offset={}", self.offset);
        Ok(())
    }

    /// Borrows the written bytes, `buf[0..offset]`. The caller must copy out to outlive the
    /// builder.
    pub fn emit(&self) -> &[u8] {
        &self.buf[..self.offset]
    }
}
