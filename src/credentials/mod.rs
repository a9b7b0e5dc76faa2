//! Credential schemas for the two Instasent API surfaces.
//!
//! - [`IngestCredentials`]: data source API (project + data source + token).
//!   Used for high-volume contact and event ingestion.
//! - [`ProductCredentials`]: product API (project UID + token). Used for
//!   audience, campaign, automation and SMS resources.
//!
//! Credentials are immutable for the lifetime of a call. Callers own them and
//! pass them by reference into the request executor.
//!
//! # Usage
//!
//! ```no_run
//! use instasent::credentials::{BearerCredentials, IngestCredentials};
//!
//! # fn main() -> anyhow::Result<()> {
//! let credentials = IngestCredentials::from_env()?;
//! println!("Test request path: {}", credentials.test_path());
//! # Ok(())
//! # }
//! ```

use crate::endpoint::{datasource_path, project_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable holding the bearer token.
pub const ENV_API_TOKEN: &str = "INSTASENT_API_TOKEN";
/// Environment variable holding the ingest project id.
pub const ENV_PROJECT_ID: &str = "INSTASENT_PROJECT_ID";
/// Environment variable holding the ingest data source id (may be blank).
pub const ENV_DATASOURCE_ID: &str = "INSTASENT_DATASOURCE_ID";
/// Environment variable holding the product project UID.
pub const ENV_PROJECT_UID: &str = "INSTASENT_PROJECT_UID";

/// Anything that can authenticate a request with a bearer token.
pub trait BearerCredentials: Send + Sync {
    /// Token sent as `Authorization: Bearer <token>`.
    fn api_token(&self) -> &str;

    /// Path (relative to the API base URL) of the request used to check
    /// that these credentials are accepted.
    fn test_path(&self) -> String;
}

/// Credentials for the data source (ingest) API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestCredentials {
    /// Project the data source belongs to
    pub project_id: String,

    /// Data source id; blank means the default API data source
    #[serde(default)]
    pub datasource_id: String,

    /// Data source API bearer token
    pub api_token: String,
}

impl IngestCredentials {
    pub fn new(
        project_id: impl Into<String>,
        datasource_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            datasource_id: datasource_id.into(),
            api_token: api_token.into(),
        }
    }

    /// Load from `INSTASENT_PROJECT_ID`, `INSTASENT_DATASOURCE_ID` (optional)
    /// and `INSTASENT_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let project_id =
            std::env::var(ENV_PROJECT_ID).with_context(|| format!("{} not set", ENV_PROJECT_ID))?;
        let datasource_id = std::env::var(ENV_DATASOURCE_ID).unwrap_or_default();
        let api_token =
            std::env::var(ENV_API_TOKEN).with_context(|| format!("{} not set", ENV_API_TOKEN))?;
        Ok(Self {
            project_id,
            datasource_id,
            api_token,
        })
    }

    /// Scope path of the data source these credentials target.
    pub fn datasource_path(&self) -> String {
        datasource_path(&self.project_id, &self.datasource_id)
    }
}

impl BearerCredentials for IngestCredentials {
    fn api_token(&self) -> &str {
        &self.api_token
    }

    fn test_path(&self) -> String {
        format!("{}/stream", self.datasource_path())
    }
}

impl fmt::Debug for IngestCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestCredentials")
            .field("project_id", &self.project_id)
            .field("datasource_id", &self.datasource_id)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Credentials for the product API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCredentials {
    /// Product API bearer token
    pub api_token: String,

    /// UID of the project to operate on
    pub project_uid: String,
}

impl ProductCredentials {
    pub fn new(api_token: impl Into<String>, project_uid: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            project_uid: project_uid.into(),
        }
    }

    /// Load from `INSTASENT_API_TOKEN` and `INSTASENT_PROJECT_UID`.
    pub fn from_env() -> Result<Self> {
        let api_token =
            std::env::var(ENV_API_TOKEN).with_context(|| format!("{} not set", ENV_API_TOKEN))?;
        let project_uid = std::env::var(ENV_PROJECT_UID)
            .with_context(|| format!("{} not set", ENV_PROJECT_UID))?;
        Ok(Self {
            api_token,
            project_uid,
        })
    }

    /// Scope path of the project these credentials target.
    pub fn project_path(&self) -> String {
        project_path(&self.project_uid)
    }
}

impl BearerCredentials for ProductCredentials {
    fn api_token(&self) -> &str {
        &self.api_token
    }

    fn test_path(&self) -> String {
        self.project_path()
    }
}

impl fmt::Debug for ProductCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductCredentials")
            .field("api_token", &"<redacted>")
            .field("project_uid", &self.project_uid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-wide; tests that touch them run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [ENV_API_TOKEN, ENV_PROJECT_ID, ENV_DATASOURCE_ID, ENV_PROJECT_UID] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_ingest_paths() {
        let creds = IngestCredentials::new("p", "", "t");
        assert_eq!(creds.datasource_path(), "/project/p/datasource/dsapi");
        assert_eq!(creds.test_path(), "/project/p/datasource/dsapi/stream");
        assert_eq!(creds.api_token(), "t");

        let creds = IngestCredentials::new("p", "ds9", "t");
        assert_eq!(creds.test_path(), "/project/p/datasource/ds9/stream");
    }

    #[test]
    fn test_product_paths() {
        let creds = ProductCredentials::new("t", "uid-1");
        assert_eq!(creds.project_path(), "/project/uid-1");
        assert_eq!(creds.test_path(), "/project/uid-1");
    }

    #[test]
    fn test_debug_redacts_token() {
        let ingest = IngestCredentials::new("p", "ds", "secret-token");
        let product = ProductCredentials::new("secret-token", "uid");
        assert!(!format!("{:?}", ingest).contains("secret-token"));
        assert!(!format!("{:?}", product).contains("secret-token"));
        assert!(format!("{:?}", product).contains("uid"));
    }

    #[test]
    fn test_deserialize_camel_case() {
        let creds: IngestCredentials =
            serde_json::from_str(r#"{"projectId":"p","apiToken":"t"}"#).unwrap();
        assert_eq!(creds.project_id, "p");
        assert_eq!(creds.datasource_id, "");

        let creds: ProductCredentials =
            serde_json::from_str(r#"{"apiToken":"t","projectUid":"u"}"#).unwrap();
        assert_eq!(creds.project_uid, "u");
    }

    #[test]
    fn test_ingest_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(ENV_PROJECT_ID, "p1");
        std::env::set_var(ENV_API_TOKEN, "tok");

        let creds = IngestCredentials::from_env().unwrap();
        assert_eq!(creds.project_id, "p1");
        assert_eq!(creds.datasource_id, "");
        assert_eq!(creds.api_token, "tok");

        clear_env();
    }

    #[test]
    fn test_product_from_env_missing() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var(ENV_API_TOKEN, "tok");

        let err = ProductCredentials::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_PROJECT_UID));

        clear_env();
    }
}
