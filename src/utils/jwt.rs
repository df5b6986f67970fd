//! Utilidades JWT
//!
//! El token de sesión es opaco para el cliente: sólo se inspecciona la
//! expiración cuando tiene forma de JWT. La firma la verifica el backend.

use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};

/// Estado de un token de sesión desde el punto de vista del cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// JWT con `exp` vigente (o sin `exp`)
    Valid,
    /// JWT cuyo `exp` ya pasó
    Expired,
    /// Token no decodificable como JWT
    Opaque,
    Empty,
}

/// Inspeccionar un token sin verificar la firma
pub fn inspect_token(token: &str) -> TokenState {
    let token = token.trim();
    if token.is_empty() {
        return TokenState::Empty;
    }

    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_aud = false;
    validation.validate_exp = true;

    match decode::<serde_json::Value>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(_) => TokenState::Valid,
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => TokenState::Expired,
            _ => TokenState::Opaque,
        },
    }
}

/// Verificar si un token puede usarse como credencial
pub fn is_token_usable(token: &str) -> bool {
    matches!(inspect_token(token), TokenState::Valid | TokenState::Opaque)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_with_exp(exp: i64) -> String {
        let claims = json!({ "id": "u1", "iat": exp - 3600, "exp": exp });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    #[test]
    fn test_valid_jwt() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        assert_eq!(inspect_token(&token_with_exp(exp)), TokenState::Valid);
    }

    #[test]
    fn test_expired_jwt() {
        let exp = chrono::Utc::now().timestamp() - 7200;
        let token = token_with_exp(exp);
        assert_eq!(inspect_token(&token), TokenState::Expired);
        assert!(!is_token_usable(&token));
    }

    #[test]
    fn test_opaque_and_empty_tokens() {
        assert_eq!(inspect_token("abc123"), TokenState::Opaque);
        assert!(is_token_usable("abc123"));
        assert_eq!(inspect_token("   "), TokenState::Empty);
        assert!(!is_token_usable(""));
    }
}
