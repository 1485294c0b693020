/// JWT validation for optional request personalization
///
/// This service never issues tokens; it only validates bearer tokens minted
/// by the identity layer (RS256, public key from environment). A missing or
/// invalid token is not an error on explore endpoints: the request is simply
/// treated as anonymous and served the non-personalized trending feed.
use actix_web::HttpRequest;
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// JWT algorithm - MUST be RS256, symmetric algorithms are rejected
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims expected in tokens minted by the identity layer
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    #[serde(default)]
    pub token_type: String,
}

/// Validation key, loaded once at startup and immutable thereafter
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize the validation key from a PEM-formatted RSA public key.
///
/// Must be called during startup before any token validation. When the key
/// is never initialized, every request is served as anonymous.
pub fn initialize_public_key(public_key_pem: &str) -> Result<()> {
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Invalid JWT public key PEM: {}", e))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT public key already initialized"))?;

    Ok(())
}

/// Validate an access token and return the authenticated user id.
pub fn verify_token(token: &str) -> Result<Uuid> {
    let decoding_key = JWT_DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT public key not initialized"))?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {}", e))?;

    if token_data.claims.token_type == "refresh" {
        return Err(anyhow!("Refresh tokens cannot be used for API access"));
    }

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| anyhow!("Token subject is not a valid UUID"))
}

/// Extract the authenticated viewer from an optional bearer token.
///
/// Returns None for absent, malformed, or expired tokens - the explore
/// endpoints degrade to anonymous rather than rejecting the request.
pub fn viewer_from_request(req: &HttpRequest) -> Option<Uuid> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    match verify_token(token) {
        Ok(user_id) => Some(user_id),
        Err(e) => {
            debug!("Ignoring invalid bearer token, serving anonymous: {}", e);
            None
        }
    }
}
