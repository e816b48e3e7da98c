//! Player identity for the match socket.
//!
//! Tokens are minted by the external auth service; this side only verifies
//! them. Without `JWT_SECRET` the server runs open and hands out ids.

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest, Result as ActixResult,
};
use anyhow::Context;
use chrono::{Duration, Utc};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::settings;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    pid: String, // player_id
    exp: usize,
}

/// Query string accepted by the socket endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
    pub name: Option<String>,
}

/// Verify `token` and return the player id it carries.
pub fn verify_token(token: &str, secret: &str) -> anyhow::Result<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("invalid / expired token")?;
    Uuid::parse_str(&data.claims.pid).context("bad pid claim")
}

/// Mint a token the way the auth service does.
pub fn issue_token(user_id: Uuid, player_id: Uuid, secret: &str, ttl: Duration) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        pid: player_id.to_string(),
        exp: (Utc::now() + ttl).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("token encoding")
}

/// Who is on the other end of the socket.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerIdentity {
    pub player_id: Uuid,
    pub name: String,
}

impl PlayerIdentity {
    /// Resolve an identity from an optional bearer header and the query.
    pub fn resolve(
        secret: Option<&str>,
        bearer: Option<&str>,
        query: SocketQuery,
    ) -> Result<Self, &'static str> {
        let player_id = match secret {
            Some(secret) => {
                let token = bearer
                    .or(query.token.as_deref())
                    .ok_or("missing token")?;
                verify_token(token, secret).map_err(|_| "invalid / expired token")?
            }
            None => Uuid::new_v4(),
        };

        let name = query
            .name
            .as_deref()
            .and_then(normalize_name)
            .unwrap_or_else(|| default_name(player_id));

        Ok(PlayerIdentity { player_id, name })
    }
}

pub const MAX_NAME_LEN: usize = 32;

/// Trimmed display name, or `None` if it is blank or longer than
/// `MAX_NAME_LEN` bytes.
pub fn normalize_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty() && name.len() <= MAX_NAME_LEN).then(|| name.to_string())
}

pub fn default_name(player_id: Uuid) -> String {
    let id = player_id.simple().to_string();
    format!("Player-{}", &id[..8])
}

impl FromRequest for PlayerIdentity {
    type Error = actix_web::Error;
    type Future = Ready<ActixResult<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        let query = web::Query::<SocketQuery>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();

        let res = PlayerIdentity::resolve(settings().jwt_secret.as_deref(), bearer, query)
            .map_err(ErrorUnauthorized);
        ready(res)
    }
}
