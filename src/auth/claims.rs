use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::dto::request::SignInRequest;

/// Claims the server owns. Registered JWT claims would also trip the
/// default validation (`aud`, `iss`, `nbf`), so none are taken from the client.
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp", "nbf", "aud", "iss", "sub", "jti"];

/// Identity carried by the session token. `profile` holds every other field
/// the client sent at sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
    pub iat: usize, // Issued at (as UTC timestamp)
    pub exp: usize, // Expiration time (as UTC timestamp)
}

impl Claims {
    pub fn new(email: &str, mut profile: Map<String, Value>, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        profile.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        Self {
            email: email.to_string(),
            profile,
            iat: now.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        }
    }

    pub fn from_sign_in(request: SignInRequest, expiration_hours: i64) -> Self {
        Self::new(&request.email, request.profile, expiration_hours)
    }
}
