// Helper functions for safe logging

use serde_json::Value;

/// Field names whose values never reach the logs
const REDACTED_FIELDS: [&str; 3] = ["password", "hashed_password", "access_token"];

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 && !parts[0].is_empty() {
            let first = parts[0].chars().next().unwrap_or('*');
            format!("{}***@{}", first, parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 16 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Replaces secret values anywhere inside a JSON document with `"***"`.
pub fn redact_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *inner = Value::String("***".to_string());
                } else {
                    redact_secrets(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_email_log() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("a@b"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_safe_token_log() {
        assert_eq!(safe_token_log("v1.local.abcdefghijklmnop"), "v1.l...mnop");
        assert_eq!(safe_token_log("short"), "***");
    }

    #[test]
    fn test_redact_secrets_nested() {
        let mut body = json!({
            "email": "a@x.com",
            "password": "secret123",
            "session": { "access_token": "v1.local.xyz", "user": { "name": "A" } },
            "items": [{ "hashed_password": "$argon2id$..." }]
        });
        redact_secrets(&mut body);

        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["password"], "***");
        assert_eq!(body["session"]["access_token"], "***");
        assert_eq!(body["session"]["user"]["name"], "A");
        assert_eq!(body["items"][0]["hashed_password"], "***");
    }
}
