//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in every access token.
///
/// `role` is kept as the raw string so that a token carrying a role this
/// build does not know still decodes; the authentication middleware rejects
/// it with a role-specific message instead of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub role: String,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            user_id: 42,
            email: "ada@uni.edu".to_string(),
            role: "student".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_259_200,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""user_id":42"#));
        assert!(serialized.contains(r#""role":"student""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"user_id":7,"email":"prof@uni.edu","role":"professor","iat":10,"exp":20}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, "professor");
        assert_eq!(claims.exp, 20);
    }
}
