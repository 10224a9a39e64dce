//! Instant payment notification (IPN) verification and parsing for Yo!.
//!
//! Yo! signs its notifications with an RSA key pair; the signature is a
//! PKCS#1 v1.5 / SHA-1 signature over a fixed-order concatenation of
//! plaintext payload fields, base64-encoded, and embedded in the payload
//! itself. Two notification shapes exist:
//!
//! - **success**: signed over `date_time + amount + narrative +
//!   network_ref + external_ref + msisdn`, signature in the `signature`
//!   field;
//! - **failure**: signed over `failed_transaction_reference +
//!   transaction_init_date`, signature in the `verification` field.
//!
//! The verification public key is loaded once at adapter construction
//! from a configured PEM file. When no key is configured or the file is
//! unloadable, verification degrades to always-true. That is a
//! development-mode fallback only: production deployments must treat a
//! missing key as a configuration error.

use base64::prelude::*;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use serde_json::Value;
use sha1::Sha1;

use crate::domain::{WebhookKind, WebhookPayload};

/// Verifies and parses Yo! IPN payloads.
///
/// The key is owned by the adapter instance, not process-global, so
/// differently-configured adapters (and tests) do not interfere.
pub struct IpnVerifier {
    verifying_key: Option<VerifyingKey<Sha1>>,
}

impl IpnVerifier {
    /// Load the verification key from a PEM file, if configured.
    ///
    /// Accepts both SPKI (`BEGIN PUBLIC KEY`) and PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`) encodings. Load failures degrade to the
    /// no-key mode with a warning rather than refusing construction.
    pub fn from_key_file(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self { verifying_key: None };
        };

        let pem = match std::fs::read_to_string(path) {
            Ok(pem) => pem,
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to read IPN public key file");
                return Self { verifying_key: None };
            }
        };

        let key = RsaPublicKey::from_public_key_pem(&pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(&pem));
        match key {
            Ok(key) => Self {
                verifying_key: Some(VerifyingKey::<Sha1>::new(key)),
            },
            Err(e) => {
                tracing::warn!(path, error = %e, "failed to parse IPN public key");
                Self { verifying_key: None }
            }
        }
    }

    /// Whether a real key is loaded (false means degraded always-true mode).
    pub fn has_key(&self) -> bool {
        self.verifying_key.is_some()
    }

    /// Verify an IPN payload's signature.
    ///
    /// `detached_signature` is consulted when the payload itself carries
    /// no signature field. Unrecognized payload shapes verify false.
    pub fn verify(&self, payload: &Value, detached_signature: Option<&str>) -> bool {
        let Some(key) = &self.verifying_key else {
            tracing::warn!(
                "no IPN public key configured; accepting notification unverified"
            );
            return true;
        };

        let (message, signature) = if is_success_shape(payload) {
            (
                success_message(payload),
                text_field(payload, "signature")
                    .or_else(|| detached_signature.map(str::to_string)),
            )
        } else if is_failure_shape(payload) {
            (
                failure_message(payload),
                text_field(payload, "verification")
                    .or_else(|| detached_signature.map(str::to_string)),
            )
        } else {
            tracing::warn!("IPN payload matches no known notification shape");
            return false;
        };

        let Some(signature) = signature else {
            return false;
        };
        let Ok(signature_bytes) = BASE64_STANDARD.decode(signature.trim()) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(signature_bytes.as_slice()) else {
            return false;
        };

        let verified = key.verify(message.as_bytes(), &signature).is_ok();
        if !verified {
            tracing::warn!("IPN signature verification failed");
        }
        verified
    }

    /// Normalize an IPN payload, independent of verification.
    pub fn parse(&self, payload: &Value) -> WebhookPayload {
        if is_success_shape(payload) {
            WebhookPayload {
                kind: WebhookKind::Success,
                external_reference: text_field(payload, "external_ref"),
                gateway_reference: None,
                mno_reference: text_field(payload, "network_ref"),
                amount: text_field(payload, "amount").and_then(|a| a.parse().ok()),
                phone_number: text_field(payload, "msisdn"),
                timestamp: text_field(payload, "date_time"),
                raw: payload.clone(),
            }
        } else if is_failure_shape(payload) {
            WebhookPayload {
                kind: WebhookKind::Failure,
                external_reference: text_field(payload, "external_ref"),
                gateway_reference: text_field(payload, "failed_transaction_reference"),
                mno_reference: None,
                amount: None,
                phone_number: None,
                timestamp: text_field(payload, "transaction_init_date"),
                raw: payload.clone(),
            }
        } else {
            WebhookPayload::unrecognized(payload.clone())
        }
    }
}

/// Success notifications carry a signature plus the caller's reference.
fn is_success_shape(payload: &Value) -> bool {
    payload.get("signature").is_some() && payload.get("external_ref").is_some()
}

/// Failure notifications carry a `verification` signature plus the failed
/// transaction's reference.
fn is_failure_shape(payload: &Value) -> bool {
    payload.get("verification").is_some()
        && payload.get("failed_transaction_reference").is_some()
}

fn success_message(payload: &Value) -> String {
    [
        "date_time",
        "amount",
        "narrative",
        "network_ref",
        "external_ref",
        "msisdn",
    ]
    .into_iter()
    .map(|field| text_field(payload, field).unwrap_or_default())
    .collect()
}

fn failure_message(payload: &Value) -> String {
    ["failed_transaction_reference", "transaction_init_date"]
        .into_iter()
        .map(|field| text_field(payload, field).unwrap_or_default())
        .collect()
}

/// Read a payload field as text. Numbers are rendered verbatim so signed
/// concatenations match what the provider sent.
fn text_field(payload: &Value, name: &str) -> Option<String> {
    match payload.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
