use serde::{Deserialize, Serialize};

/// JWT payload carried by every session token. Typed once, validated at
/// verification; handlers never touch raw claim maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub role: String,
    pub exp: usize,
}
