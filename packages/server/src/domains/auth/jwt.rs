use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sessions are stateless; the token lifetime is the session lifetime.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject, the user id as a string.
    pub sub: String,
    /// The user id again, typed, so callers skip re-parsing `sub`.
    pub user_id: Uuid,
    /// Username at issue time, for logs.
    pub username: String,
    /// Expiration, unix seconds.
    pub exp: i64,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Issuer.
    pub iss: String,
    /// Unique token id.
    pub jti: String,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
        }
    }

    /// Issue a token for `user_id`, valid for seven days.
    pub fn create_token(&self, user_id: Uuid, username: String) -> Result<String> {
        let now = chrono::Utc::now();
        let expires = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            username,
            exp: expires.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Decode and check signature, expiry and issuer.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret_key", "test_issuer".to_string())
    }

    #[test]
    fn round_trips_the_claims() {
        let jwt = service();
        let user_id = Uuid::new_v4();

        let token = jwt.create_token(user_id, "sample_user".to_string()).unwrap();
        let claims = jwt.verify_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "sample_user");
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn rejects_garbage() {
        assert!(service().verify_token("not_a_token").is_err());
        assert!(service().verify_token("").is_err());
    }

    #[test]
    fn rejects_a_foreign_secret() {
        let ours = service();
        let theirs = JwtService::new("other_secret", "test_issuer".to_string());

        let token = theirs
            .create_token(Uuid::new_v4(), "sample_user".to_string())
            .unwrap();

        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_a_foreign_issuer() {
        let ours = service();
        let theirs = JwtService::new("test_secret_key", "someone_else".to_string());

        let token = theirs
            .create_token(Uuid::new_v4(), "sample_user".to_string())
            .unwrap();

        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn tokens_live_for_seven_days() {
        let jwt = service();
        let token = jwt
            .create_token(Uuid::new_v4(), "sample_user".to_string())
            .unwrap();
        let claims = jwt.verify_token(&token).unwrap();

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, TOKEN_TTL_DAYS * 86_400);
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let jwt = service();
        let user_id = Uuid::new_v4();

        let first = jwt.create_token(user_id, "sample_user".to_string()).unwrap();
        let second = jwt.create_token(user_id, "sample_user".to_string()).unwrap();

        let a = jwt.verify_token(&first).unwrap();
        let b = jwt.verify_token(&second).unwrap();
        assert_ne!(a.jti, b.jti);
    }
}
