//! The settings mapping and its field names.
//!
//! Exactly three recognized fields. On-disk and environment names keep
//! the `PRIVATE_KEY` / `DEMOS_RPC` / `REFERRAL_CODE` spelling so existing
//! config files and `.env` files stay parseable indefinitely.

use serde::{Deserialize, Serialize};

/// The plaintext settings mapping. Only `private_key` is ever encrypted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "PRIVATE_KEY", default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(rename = "DEMOS_RPC", default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    #[serde(rename = "REFERRAL_CODE", default, skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

impl Settings {
    /// Get a field value, treating empty strings as unset.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::PrivateKey => self.private_key.as_deref(),
            Field::RpcUrl => self.rpc_url.as_deref(),
            Field::ReferralCode => self.referral_code.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// One of the three recognized settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PrivateKey,
    RpcUrl,
    ReferralCode,
}

impl Field {
    /// All fields, in display order.
    pub const ALL: [Field; 3] = [Field::PrivateKey, Field::RpcUrl, Field::ReferralCode];

    /// The environment variable (and on-disk key) for this field.
    pub fn env_var(self) -> &'static str {
        match self {
            Field::PrivateKey => "PRIVATE_KEY",
            Field::RpcUrl => "DEMOS_RPC",
            Field::ReferralCode => "REFERRAL_CODE",
        }
    }

    /// Whether this field holds a secret and must be masked in output.
    pub fn is_secret(self) -> bool {
        matches!(self, Field::PrivateKey)
    }
}
