//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Token issuance, verification, tampering and expiry
//! - Password hashing
//! - Authorization header parsing and ownership checks

#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    use crate::auth::middleware::bearer_token;
    use crate::auth::password::{
        hash_password, hash_password_blocking, verify_password, verify_password_blocking,
        HashError,
    };
    use crate::auth::token::{generate_symmetric_key, SYMMETRIC_KEY_SIZE};
    use crate::common::ApiError;

    const TEST_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    fn authority() -> TokenAuthority {
        TokenAuthority::new(TEST_KEY).expect("Failed to build token authority")
    }

    #[test]
    fn test_token_round_trip() {
        let authority = authority();
        let (token, issued) = authority
            .create_token("a@x.com", Duration::minutes(15))
            .expect("Failed to create token");

        assert!(token.starts_with("v1.local."));

        let verified = authority.verify_token(&token).expect("Failed to verify token");
        assert_eq!(verified, issued);
        assert_eq!(verified.subject, "a@x.com");
        assert!(verified.expires_at > verified.issued_at);
        assert_eq!(verified.expires_at - verified.issued_at, Duration::minutes(15));
    }

    #[test]
    fn test_token_does_not_leak_subject() {
        let (token, _) = authority()
            .create_token("visible@x.com", Duration::minutes(1))
            .unwrap();
        assert!(!token.contains("visible"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let authority = authority();
        let now = Utc::now();
        let (token, payload) = authority
            .create_token_at("a@x.com", Duration::minutes(1), now)
            .unwrap();

        assert!(authority
            .verify_token_at(&token, now + Duration::seconds(59))
            .is_ok());

        let at_expiry = authority.verify_token_at(&token, payload.expires_at);
        assert!(matches!(at_expiry, Err(TokenError::Expired)));

        let later = authority.verify_token_at(&token, now + Duration::minutes(2));
        assert!(matches!(later, Err(TokenError::Expired)));
    }

    #[test]
    fn test_any_modified_character_invalidates_token() {
        let authority = authority();
        let (token, _) = authority
            .create_token("a@x.com", Duration::minutes(15))
            .unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            let result = authority.verify_token(&tampered);
            assert!(
                matches!(result, Err(TokenError::Invalid(_))),
                "modification at position {} was not detected",
                i
            );
        }
    }

    #[test]
    fn test_token_from_other_key_is_invalid() {
        let (token, _) = authority()
            .create_token("a@x.com", Duration::minutes(15))
            .unwrap();

        let other = TokenAuthority::new(b"fedcba9876543210fedcba9876543210").unwrap();
        assert!(matches!(
            other.verify_token(&token),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_tokens_are_invalid() {
        let authority = authority();
        for token in ["", "v1.local.", "v1.local.abc", "not-a-token", "v2.local.AAAA"] {
            assert!(
                matches!(authority.verify_token(token), Err(TokenError::Invalid(_))),
                "{:?} was accepted",
                token
            );
        }
    }

    #[test]
    fn test_key_length_is_enforced() {
        for len in [0usize, 16, 31, 33, 64] {
            let key = vec![7u8; len];
            match TokenAuthority::new(&key) {
                Err(TokenError::InvalidKeyLength { expected, actual }) => {
                    assert_eq!(expected, SYMMETRIC_KEY_SIZE);
                    assert_eq!(actual, len);
                }
                other => panic!("key of {} bytes gave {:?}", len, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let authority = authority();
        assert!(matches!(
            authority.create_token("a@x.com", Duration::zero()),
            Err(TokenError::Creation(_))
        ));
        assert!(matches!(
            authority.create_token("a@x.com", Duration::seconds(-5)),
            Err(TokenError::Creation(_))
        ));
    }

    #[test]
    fn test_token_ids_are_unique() {
        let authority = authority();
        let mut ids = HashSet::new();
        let mut tokens = HashSet::new();
        for _ in 0..50 {
            let (token, payload) = authority
                .create_token("a@x.com", Duration::minutes(15))
                .unwrap();
            assert!(ids.insert(payload.id));
            assert!(tokens.insert(token));
        }
    }

    #[test]
    fn test_generated_key_is_usable() {
        let key = generate_symmetric_key();
        assert_eq!(key.len(), SYMMETRIC_KEY_SIZE);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(TokenAuthority::new(key.as_bytes()).is_ok());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secret123").expect("Failed to hash password");

        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = verify_password("secret123", "not-a-phc-string");
        assert!(matches!(result, Err(HashError::MalformedHash(_))));
    }

    #[tokio::test]
    async fn test_blocking_hash_helpers() {
        let hash = hash_password_blocking("secret123".to_string()).await.unwrap();
        let ok = verify_password_blocking("secret123".to_string(), hash)
            .await
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(bearer_token("bearer abc").unwrap(), "abc");
        assert_eq!(bearer_token("  BEARER   abc ").unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_failures() {
        let message = |header: &str| match bearer_token(header) {
            Err(ApiError::Unauthorized(msg)) => msg,
            other => panic!("{:?} gave {:?}", header, other),
        };

        assert_eq!(message(""), "authorization-header-is-not-provided");
        assert_eq!(message("Bearer"), "invalid-authorization-header-format");
        assert_eq!(message("Bearer a b"), "invalid-authorization-header-format");
        assert_eq!(message("Basic abc"), "unsupported-authorization-type");
    }

    struct Note {
        owner: String,
    }

    impl Owned for Note {
        fn owner(&self) -> &str {
            &self.owner
        }
    }

    fn authed(email: &str) -> AuthedUser {
        let (_, payload) = authority()
            .create_token(email, Duration::minutes(1))
            .unwrap();
        AuthedUser {
            email: email.to_string(),
            payload,
        }
    }

    #[test]
    fn test_ensure_owner() {
        let note = Note {
            owner: "a@x.com".to_string(),
        };

        assert!(ensure_owner(&note, &authed("a@x.com")).is_ok());
        match ensure_owner(&note, &authed("b@x.com")) {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "wrong-user"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
