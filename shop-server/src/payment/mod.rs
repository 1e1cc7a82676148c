//! Payment gateway integration
//!
//! Callback authentication lives here; gateway order creation is in `gateway`.
//!
//! The gateway signs `order_ref|payment_ref` with the merchant key secret
//! (HMAC-SHA256, hex). Anything that does not match byte for byte is
//! rejected; the comparison is constant time via `Mac::verify_slice`.

mod gateway;

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub use gateway::{
    CURRENCY, DEFAULT_API_BASE, GatewayError, GatewayOrder, PaymentGateway, RazorpayGateway,
    to_minor_units,
};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_HEX_LEN: usize = 64;

fn mac_for(order_ref: &str, payment_ref: &str, secret: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(order_ref.as_bytes());
    mac.update(b"|");
    mac.update(payment_ref.as_bytes());
    Some(mac)
}

/// Hex HMAC the gateway is expected to send for this pair
pub fn sign(order_ref: &str, payment_ref: &str, secret: &str) -> String {
    mac_for(order_ref, payment_ref, secret)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Check a callback signature. Malformed input is a mismatch, never an error.
///
/// Only the canonical encoding is accepted: exactly 64 lowercase hex digits,
/// no surrounding whitespace.
pub fn verify(order_ref: &str, payment_ref: &str, signature: &str, secret: &str) -> bool {
    if !is_canonical_hex(signature) {
        return false;
    }
    let Ok(sig_bytes) = hex::decode(signature) else {
        return false;
    };
    let Some(mac) = mac_for(order_ref, payment_ref, secret) else {
        return false;
    };
    mac.verify_slice(&sig_bytes).is_ok()
}

fn is_canonical_hex(signature: &str) -> bool {
    signature.len() == SIGNATURE_HEX_LEN
        && signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rzp_test_secret";

    #[test]
    fn test_valid_signature() {
        let sig = sign("order_ABC", "pay_123", SECRET);
        assert_eq!(sig.len(), 64);
        assert!(verify("order_ABC", "pay_123", &sig, SECRET));
    }

    #[test]
    fn test_message_is_pipe_joined() {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(b"order_ABC|pay_123");
        let expected = hex::encode(mac.finalize().into_bytes());
        assert_eq!(sign("order_ABC", "pay_123", SECRET), expected);
        assert!(verify("order_ABC", "pay_123", &expected, SECRET));
    }

    #[test]
    fn test_any_bit_flip_rejected() {
        let sig = sign("order_ABC", "pay_123", SECRET);
        let bytes = hex::decode(&sig).unwrap();
        for i in 0..bytes.len() {
            for bit in 0..8 {
                let mut mutated = bytes.clone();
                mutated[i] ^= 1 << bit;
                assert!(!verify("order_ABC", "pay_123", &hex::encode(&mutated), SECRET));
            }
        }
    }

    #[test]
    fn test_swapped_refs_rejected() {
        let sig = sign("pay_123", "order_ABC", SECRET);
        assert!(!verify("order_ABC", "pay_123", &sig, SECRET));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let sig = sign("order_ABC", "pay_123", "other");
        assert!(!verify("order_ABC", "pay_123", &sig, SECRET));
    }

    #[test]
    fn test_malformed_signature_is_false() {
        let sig = sign("order_ABC", "pay_123", SECRET);
        assert!(!verify("order_ABC", "pay_123", "", SECRET));
        assert!(!verify("order_ABC", "pay_123", "zz-not-hex", SECRET));
        assert!(!verify("order_ABC", "pay_123", &sig[..62], SECRET));
        assert!(!verify("order_ABC", "pay_123", &format!("{sig}00"), SECRET));
    }

    #[test]
    fn test_only_canonical_encoding_accepted() {
        let sig = sign("order_ABC", "pay_123", SECRET);
        assert!(!verify("order_ABC", "pay_123", &sig.to_uppercase(), SECRET));
        assert!(!verify("order_ABC", "pay_123", &format!(" {sig}"), SECRET));
        assert!(!verify("order_ABC", "pay_123", &format!("{sig}\n"), SECRET));
    }
}
