use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier resolved by the external auth/billing services and
/// carried on the access token. Discovery only reads it; it never decides
/// entitlement itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Unlimited,
}

impl Default for AccountTier {
    fn default() -> Self {
        AccountTier::Free
    }
}

impl std::fmt::Display for AccountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountTier::Free => write!(f, "free"),
            AccountTier::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl std::str::FromStr for AccountTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(AccountTier::Free),
            "unlimited" => Ok(AccountTier::Unlimited),
            _ => Err(format!("unknown tier: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub tier: AccountTier,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl Claims {
    pub fn new(user_id: Uuid, tier: AccountTier, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            tier,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub tier: AccountTier,
    pub token_id: Uuid,
}

impl AuthUser {
    pub fn is_unlimited(&self) -> bool {
        self.tier == AccountTier::Unlimited
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            tier: claims.tier,
            token_id: claims.jti,
        }
    }
}
