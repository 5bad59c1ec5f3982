//! The recursive attestation state machine.
//!
//! `attest` walks a fixed sequence of steps over a [`Parser`], each of which either advances to
//! the next step or fails with a specific [`Error`] variant naming exactly what went wrong:
//!
//! - S0 reset: discard any previous attestation, start from the full raw certificate.
//! - S1 locate `SIGNER_ID`.
//! - S2 locate `SIGNATURE`.
//! - S3 resolve the signer's keys in force at `block_height`.
//! - S4 verify the signature over every byte up to and including the `SIGNATURE` field's header.
//! - S5 trim the attested view to end at the start of the `SIGNATURE` field's header (nothing
//!   from `SIGNATURE` onward is trusted, even if physically present in the slice), then, in
//!   `ParseMode::Strict`, reject any bytes left over past the end of the `SIGNATURE` record.
//! - S6 if `verify_contract` is false, attestation is complete.
//! - S7 locate `TRANSACTION_TYPE`.
//! - S8 locate `ARTIFACT_ID`.
//! - S9 resolve the contract for this transaction-type/artifact pair.
//! - S10 invoke the contract closure.
//! - S11 the certificate is fully attested.
//!
//! Calling `attest` again on an already-attested parser re-runs every step from S0: the function
//! is idempotent, not merely memoized, since a resolver's answer may have changed since the last
//! call (e.g. a key rotation).

#[cfg(feature = "alloc")]
use log::{debug, warn};

use crate::constants;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::options::Permissive;
use crate::parser::Parser;
use crate::resolver::ContractOutcome;
use uuid::Uuid;

fn field_uuid(field: &Field<'_>) -> Result<Uuid> {
    if field.value.len() != constants::SIGNER_ID_SIZE {
        return Err(Error::AttestMissingSignerUuid);
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(field.value);
    Ok(Uuid::from_bytes(bytes))
}

/// Runs the full attestation state machine against `parser`.
///
/// On success, `parser.attested_length()` is trimmed to exclude the `SIGNATURE` field (and
/// everything after it), and (if `verify_contract` is true) the registered contract closure has
/// accepted the certificate. On failure, `parser`'s attested view has already been reset to the
/// full raw certificate (S0), so a caller inspecting the parser after an error sees the
/// pre-attestation state, not a partially-trimmed one.
pub fn attest<'a, 's>(
    parser: &mut Parser<'a, 's>,
    block_height: u64,
    verify_contract: bool,
) -> Result<()> {
    // S0: reset.
    #[cfg(feature = "alloc")]
    debug!("attest: S0 reset, block_height={}", block_height);
    parser.reset_attestation();

    // S1: locate SIGNER_ID.
    let signer_field = parser
        .find_short(constants::SIGNER_ID)
        .map_err(|_| Error::AttestMissingSignerUuid)?;
    let signer_id = field_uuid(&signer_field)?;
    #[cfg(feature = "alloc")]
    debug!("attest: S1 located SIGNER_ID at offset {}", signer_field.offset);

    // S2: locate SIGNATURE, which must immediately follow SIGNER_ID and hold exactly
    // signature_size() bytes.
    let sig_field = parser
        .field_next(&signer_field)
        .map_err(|_| Error::AttestMissingSignature)?;
    if sig_field.field_type != constants::SIGNATURE
        || sig_field.value.len() != parser.crypto().signature_size()
    {
        #[cfg(feature = "alloc")]
        warn!("attest: S2 missing or wrong-size SIGNATURE field");
        return Err(Error::AttestMissingSignature);
    }
    #[cfg(feature = "alloc")]
    debug!("attest: S2 located SIGNATURE at offset {}", sig_field.offset);

    // S3: resolve the signer's keys in force at block_height.
    let (_public_encryption_key, public_signing_key) = parser
        .entity_key_resolver()
        .resolve(&*parser, block_height, signer_id)?
        .ok_or(Error::AttestMissingSigningCert)?;
    #[cfg(feature = "alloc")]
    debug!("attest: S3 resolved signer keys for {}", signer_id);

    // S4: verify the signature over everything up to and including the SIGNATURE field's header,
    // i.e. everything strictly before its value starts.
    let message_end = sig_field.offset + crate::field::FIELD_HEADER_SIZE;
    let message = &parser_bytes(parser)[..message_end];
    let ok = parser
        .crypto()
        .verify(message, sig_field.value, &public_signing_key)?;
    if !ok {
        #[cfg(feature = "alloc")]
        warn!("attest: S4 signature verification failed");
        return Err(Error::AttestSignatureMismatch);
    }
    #[cfg(feature = "alloc")]
    debug!("attest: S4 signature verified");

    // S5: trim. Attested length is the offset of the SIGNATURE field header itself — nothing
    // from the SIGNATURE field onward (header or value) is part of the trusted region.
    parser.set_attested_length(sig_field.offset);
    #[cfg(feature = "alloc")]
    debug!("attest: S5 trimmed attested_length to {}", sig_field.offset);

    let trailing = parser.raw_length().saturating_sub(sig_field.next_offset());
    if trailing > 0 {
        let permissive = parser.parse_mode().is_permissive();
        let outcome: core::result::Result<(), Error> = Err(Error::AttestTrailingBytes(trailing));
        outcome.or_permissive_and_default(permissive, "attest: trailing bytes past signed certificate")?;
    }

    // S6: stop here unless contract verification was requested.
    if !verify_contract {
        #[cfg(feature = "alloc")]
        debug!("attest: S6 verify_contract=false, attestation complete");
        return Ok(());
    }

    // S7: locate TRANSACTION_TYPE.
    let txn_type_field = parser
        .find_short(constants::TRANSACTION_TYPE)
        .map_err(|_| Error::AttestMissingTransactionType)?;
    let txn_type_uuid = field_uuid(&txn_type_field).map_err(|_| Error::AttestMissingTransactionType)?;
    #[cfg(feature = "alloc")]
    debug!("attest: S7 located TRANSACTION_TYPE {}", txn_type_uuid);

    // S8: locate ARTIFACT_ID.
    let artifact_id_field = parser
        .find_short(constants::ARTIFACT_ID)
        .map_err(|_| Error::AttestMissingArtifactId)?;
    let artifact_uuid = field_uuid(&artifact_id_field).map_err(|_| Error::AttestMissingArtifactId)?;
    #[cfg(feature = "alloc")]
    debug!("attest: S8 located ARTIFACT_ID {}", artifact_uuid);

    // S9: resolve the contract.
    let outcome = parser
        .contract_resolver()
        .resolve(&*parser, txn_type_uuid, artifact_uuid)?;
    let closure = match outcome {
        ContractOutcome::NoMapping => {
            #[cfg(feature = "alloc")]
            warn!("attest: S9 no contract mapping for this transaction type and artifact");
            return Err(Error::AttestMissingContract);
        }
        ContractOutcome::Found(closure) => closure,
    };
    #[cfg(feature = "alloc")]
    debug!("attest: S9 resolved contract closure");

    // S10: invoke the contract closure.
    let accepted = closure.verify(&*parser)?;
    if !accepted {
        #[cfg(feature = "alloc")]
        warn!("attest: S10 contract closure rejected the certificate");
        return Err(Error::AttestContractVerification);
    }

    // S11: fully attested.
    #[cfg(feature = "alloc")]
    debug!("attest: S11 fully attested");
    Ok(())
}

fn parser_bytes<'a, 's>(parser: &Parser<'a, 's>) -> &'a [u8] {
    // The raw certificate bytes, independent of the current attested trim, since the
    // signed-over range spans up to the SIGNATURE header regardless of where attested_length
    // currently sits (it was just reset to raw_length at S0).
    parser.raw_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Builder, BuilderOptions};
    use crate::crypto::{CryptoSigner, CryptoVerifier};
    use crate::parser::ParserOptions;
    use crate::resolver::{
        ArtifactStateResolver, CertificateView, ContractClosure, ContractOutcome, ContractResolver,
        EntityKeyResolver, TransactionResolver,
    };
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    struct XorSuite;

    const KEY: &[u8] = b"test-signing-key";

    impl CryptoSigner for XorSuite {
        type PrivateKey = [u8];

        fn signature_size(&self) -> usize {
            8
        }

        fn sign(&self, message: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
            let mut out = alloc::vec![0u8; 8];
            for (i, b) in message.iter().enumerate() {
                out[i % 8] ^= b ^ private_key[i % private_key.len()];
            }
            Ok(out)
        }
    }

    impl CryptoVerifier for XorSuite {
        fn signature_size(&self) -> usize {
            8
        }

        fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
            let mut expect = alloc::vec![0u8; 8];
            for (i, b) in message.iter().enumerate() {
                expect[i % 8] ^= b ^ public_key[i % public_key.len()];
            }
            Ok(expect == signature)
        }
    }

    struct FixedKeyResolver;

    impl EntityKeyResolver for FixedKeyResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _height: u64,
            _entity_uuid: Uuid,
        ) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
            Ok(Some((Vec::new(), KEY.to_vec())))
        }
    }

    struct NoKeyResolver;

    impl EntityKeyResolver for NoKeyResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _height: u64,
            _entity_uuid: Uuid,
        ) -> Result<Option<(Vec<u8>, Vec<u8>)>> {
            Ok(None)
        }
    }

    struct NullTxnResolver;
    impl TransactionResolver for NullTxnResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _artifact_uuid: Uuid,
            _txn_uuid: Option<Uuid>,
        ) -> Result<Option<(Vec<u8>, bool)>> {
            Ok(None)
        }
    }

    struct NullStateResolver;
    impl ArtifactStateResolver for NullStateResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _artifact_uuid: Uuid,
        ) -> Result<(Option<i32>, Option<Uuid>)> {
            Ok((None, None))
        }
    }

    struct AlwaysAcceptClosure;
    impl ContractClosure for AlwaysAcceptClosure {
        fn verify(&self, _parser: &dyn CertificateView) -> Result<bool> {
            Ok(true)
        }
    }

    struct AlwaysRejectClosure;
    impl ContractClosure for AlwaysRejectClosure {
        fn verify(&self, _parser: &dyn CertificateView) -> Result<bool> {
            Ok(false)
        }
    }

    struct AcceptingContractResolver;
    impl ContractResolver for AcceptingContractResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _txn_type_uuid: Uuid,
            _artifact_uuid: Uuid,
        ) -> Result<ContractOutcome> {
            Ok(ContractOutcome::Found(Box::new(AlwaysAcceptClosure)))
        }
    }

    struct RejectingContractResolver;
    impl ContractResolver for RejectingContractResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _txn_type_uuid: Uuid,
            _artifact_uuid: Uuid,
        ) -> Result<ContractOutcome> {
            Ok(ContractOutcome::Found(Box::new(AlwaysRejectClosure)))
        }
    }

    struct NoMappingContractResolver;
    impl ContractResolver for NoMappingContractResolver {
        fn resolve(
            &self,
            _parser: &dyn CertificateView,
            _txn_type_uuid: Uuid,
            _artifact_uuid: Uuid,
        ) -> Result<ContractOutcome> {
            Ok(ContractOutcome::NoMapping)
        }
    }

    fn build_signed_cert(signer_id: Uuid, include_txn_fields: bool) -> Vec<u8> {
        let suite = XorSuite;
        let opts = BuilderOptions::new(&suite);
        let mut builder = Builder::new(opts, 256);
        builder.add_uint16(constants::CERTIFICATE_VERSION, 1).unwrap();
        if include_txn_fields {
            builder
                .add_uuid(constants::TRANSACTION_TYPE, Uuid::from_bytes([0x22; 16]))
                .unwrap();
            builder
                .add_uuid(constants::ARTIFACT_ID, Uuid::from_bytes([0x33; 16]))
                .unwrap();
        }
        builder.sign(signer_id, KEY).unwrap();
        builder.emit().to_vec()
    }

    #[test]
    fn happy_path_signature_only() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let cert = build_signed_cert(signer_id, false);

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        let raw_len = parser.raw_length();
        attest(&mut parser, 0, false).unwrap();
        assert!(parser.attested_length() <= raw_len);
        assert!(parser.attested_length() > 0);
    }

    #[test]
    fn tampered_signature_is_rejected_and_resets_attested_length() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let mut cert = build_signed_cert(signer_id, false);
        let last = cert.len() - 1;
        cert[last] ^= 0xFF;

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        let err = attest(&mut parser, 0, false).unwrap_err();
        assert!(matches!(err, Error::AttestSignatureMismatch));
        assert_eq!(parser.attested_length(), parser.raw_length());
    }

    #[test]
    fn missing_signer_key_fails_at_key_resolution() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let cert = build_signed_cert(signer_id, false);

        let suite = XorSuite;
        let key_resolver = NoKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        let err = attest(&mut parser, 0, false).unwrap_err();
        assert!(matches!(err, Error::AttestMissingSigningCert));
    }

    #[test]
    fn contract_phase_requires_transaction_type_and_artifact_id() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let cert = build_signed_cert(signer_id, false);

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        let err = attest(&mut parser, 0, true).unwrap_err();
        assert!(matches!(err, Error::AttestMissingTransactionType));
    }

    #[test]
    fn contract_accept_and_reject_and_no_mapping() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let cert = build_signed_cert(signer_id, true);
        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;

        {
            let contract_resolver = AcceptingContractResolver;
            let opts = ParserOptions::new(
                &suite,
                &key_resolver,
                &txn_resolver,
                &state_resolver,
                &contract_resolver,
            );
            let mut parser = Parser::new(opts, &cert).unwrap();
            attest(&mut parser, 0, true).unwrap();
        }
        {
            let contract_resolver = RejectingContractResolver;
            let opts = ParserOptions::new(
                &suite,
                &key_resolver,
                &txn_resolver,
                &state_resolver,
                &contract_resolver,
            );
            let mut parser = Parser::new(opts, &cert).unwrap();
            let err = attest(&mut parser, 0, true).unwrap_err();
            assert!(matches!(err, Error::AttestContractVerification));
        }
        {
            let contract_resolver = NoMappingContractResolver;
            let opts = ParserOptions::new(
                &suite,
                &key_resolver,
                &txn_resolver,
                &state_resolver,
                &contract_resolver,
            );
            let mut parser = Parser::new(opts, &cert).unwrap();
            let err = attest(&mut parser, 0, true).unwrap_err();
            assert!(matches!(err, Error::AttestMissingContract));
        }
    }

    #[test]
    fn wrong_size_signature_field_is_rejected() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let mut cert = build_signed_cert(signer_id, false);
        // Shrink the SIGNATURE field's declared size by one byte without touching its bytes, so
        // it no longer matches the suite's signature_size().
        let sig_size_offset = cert.len() - 8 - 2;
        cert[sig_size_offset] = 0x00;
        cert[sig_size_offset + 1] = 0x07;

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        let err = attest(&mut parser, 0, false).unwrap_err();
        assert!(matches!(err, Error::AttestMissingSignature));
    }

    #[test]
    fn trailing_bytes_are_rejected_in_strict_mode_and_tolerated_in_permissive_mode() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let mut cert = build_signed_cert(signer_id, false);
        cert.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;

        let strict_opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut strict_parser = Parser::new(strict_opts, &cert).unwrap();
        let err = attest(&mut strict_parser, 0, false).unwrap_err();
        assert!(matches!(err, Error::AttestTrailingBytes(3)));

        let permissive_opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        )
        .with_parse_mode(crate::options::ParseMode::Permissive);
        let mut permissive_parser = Parser::new(permissive_opts, &cert).unwrap();
        attest(&mut permissive_parser, 0, false).unwrap();
    }

    #[test]
    fn attest_is_idempotent_across_repeated_calls() {
        let signer_id = Uuid::from_bytes([0x11; 16]);
        let cert = build_signed_cert(signer_id, false);

        let suite = XorSuite;
        let key_resolver = FixedKeyResolver;
        let txn_resolver = NullTxnResolver;
        let state_resolver = NullStateResolver;
        let contract_resolver = NoMappingContractResolver;
        let opts = ParserOptions::new(
            &suite,
            &key_resolver,
            &txn_resolver,
            &state_resolver,
            &contract_resolver,
        );
        let mut parser = Parser::new(opts, &cert).unwrap();

        attest(&mut parser, 0, false).unwrap();
        let first_len = parser.attested_length();
        attest(&mut parser, 0, false).unwrap();
        assert_eq!(parser.attested_length(), first_len);
    }
}
