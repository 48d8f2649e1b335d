use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Check an `Authorization` header value against the configured API key.
///
/// With no key configured every request is allowed.
pub fn is_authorized(authorization: Option<&str>, api_key: Option<&str>) -> bool {
    let Some(expected) = api_key else {
        return true;
    };

    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| constant_time_compare(token.trim(), expected))
        .unwrap_or(false)
}
