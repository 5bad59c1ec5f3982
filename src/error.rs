//! The crate-wide error taxonomy.
//!
//! Every fallible operation in `blockcert` returns [`Result<T>`], an alias over
//! `core::result::Result<T, Error>`. [`Error`] partitions failures by the subsystem that raised
//! them: field codec, builder, parser, or attestation engine.

use core::result;

quick_error::quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// A lower-level `scroll` codec failure (short read, bad context) while decoding a field
        /// header.
        Scroll(err: scroll::Error) {
            from()
            display("field codec error: {}", err)
        }
        /// Caller contract violation: an empty slice, a zero-length buffer where one is required,
        /// or a missing required field. Not recoverable at this call site.
        InvalidArg(msg: &'static str) {
            display("invalid argument: {}", msg)
        }
        /// A field record's declared `size` would read past the end of the trusted region.
        InvalidFieldSize(offset: usize, size: u16, limit: usize) {
            display("field at offset {} declares size {} but only {} bytes remain", offset, size, limit)
        }
        /// Iteration or lookup exhausted the certificate without finding a matching field.
        FieldNotFound {
            display("no matching field found")
        }
        /// `find_next` specifically exhausted the certificate without finding another field of
        /// the same type.
        FindNextFieldNotFound {
            display("no further field of the same type found")
        }
        /// The parser was constructed over an empty certificate slice.
        ParserInitInvalidArg {
            display("parser cannot be initialized over an empty certificate")
        }
        /// A builder append failed a capacity or argument check.
        AddInvalidArg(msg: &'static str) {
            display("cannot append field: {}", msg)
        }
        /// A builder append's payload exceeded the 16-bit wire size limit.
        AddTooBig(size: usize) {
            display("payload size {} exceeds the 65535-byte field limit", size)
        }
        /// The builder's remaining capacity cannot hold the `SIGNER_ID`/`SIGNATURE` footer.
        SignInvalidFieldSize(needed: usize, remaining: usize) {
            display("signing footer needs {} bytes but only {} remain", needed, remaining)
        }
        /// Required well-known `SIGNER_ID` field is absent or the wrong size.
        AttestMissingSignerUuid {
            display("certificate is missing a well-formed SIGNER_ID field")
        }
        /// Required well-known `SIGNATURE` field is absent or the wrong size.
        AttestMissingSignature {
            display("certificate is missing a well-formed SIGNATURE field")
        }
        /// The entity-key resolver reported no keys in force for the signer at this height.
        AttestMissingSigningCert {
            display("no signing certificate found for the asserted signer at this block height")
        }
        /// The cryptographic signature did not verify.
        AttestSignatureMismatch {
            display("signature verification failed")
        }
        /// Required well-known `TRANSACTION_TYPE` field is absent during the contract phase.
        AttestMissingTransactionType {
            display("certificate is missing a well-formed TRANSACTION_TYPE field")
        }
        /// Required well-known `ARTIFACT_ID` field is absent during the contract phase.
        AttestMissingArtifactId {
            display("certificate is missing a well-formed ARTIFACT_ID field")
        }
        /// The contract resolver returned no mapping for the transaction-type/artifact pair.
        AttestMissingContract {
            display("no contract mapping for this transaction type and artifact")
        }
        /// The contract closure rejected the certificate.
        AttestContractVerification {
            display("contract verification rejected the certificate")
        }
        /// An unexpected failure surfaced from the crypto suite (allocation, internal error).
        AttestGeneral(msg: &'static str) {
            display("attestation failed: {}", msg)
        }
        /// Bytes remain in the certificate slice past the end of the `SIGNATURE` field's record.
        /// Only raised in `ParseMode::Strict`; `ParseMode::Permissive` logs and continues.
        AttestTrailingBytes(extra: usize) {
            display("{} trailing byte(s) found past the end of the signed certificate", extra)
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
