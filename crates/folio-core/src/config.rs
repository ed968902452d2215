//! Configuration module
//!
//! Admin configuration read from the environment (and a `.env` file when present):
//! storage backends, image limits and the required-field schema variant.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::MAX_IMAGE_SIZE_BYTES;
use crate::storage_types::StorageBackend;

/// Which form fields a save requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredFields {
    /// Title, description, project, client, date and category
    #[default]
    Full,
    /// Same as `Full` without the category
    Reduced,
}

impl RequiredFields {
    /// Draft field names that must be non-empty, in form order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            RequiredFields::Full => &[
                "english_title",
                "korean_description",
                "project",
                "client",
                "date",
                "category",
            ],
            RequiredFields::Reduced => &[
                "english_title",
                "korean_description",
                "project",
                "client",
                "date",
            ],
        }
    }
}

impl FromStr for RequiredFields {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(RequiredFields::Full),
            "reduced" => Ok(RequiredFields::Reduced),
            _ => Err(anyhow::anyhow!("Invalid required field set: {}", s)),
        }
    }
}

impl Display for RequiredFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RequiredFields::Full => write!(f, "full"),
            RequiredFields::Reduced => write!(f, "reduced"),
        }
    }
}

/// Admin console configuration
#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub environment: String,
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub document_store_path: Option<String>,
    pub max_image_size_bytes: u64,
    pub required_fields: RequiredFields,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage_backend: StorageBackend::Memory,
            local_storage_path: None,
            local_storage_base_url: None,
            document_store_path: None,
            max_image_size_bytes: MAX_IMAGE_SIZE_BYTES,
            required_fields: RequiredFields::Full,
        }
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let max_image_size_bytes = env::var("MAX_IMAGE_SIZE_BYTES")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_BYTES.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be a valid number"))?;

        let required_fields = match env::var("REQUIRED_FIELDS") {
            Ok(value) => value.parse()?,
            Err(_) => RequiredFields::Full,
        };

        let config = Self {
            environment,
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            document_store_path: env::var("DOCUMENT_STORE_PATH").ok(),
            max_image_size_bytes,
            required_fields,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be greater than zero"));
        }

        if self.storage_backend == StorageBackend::Local {
            if self.local_storage_path.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
                ));
            }
            if self.local_storage_base_url.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                ));
            }
            if self.document_store_path.is_none() {
                return Err(anyhow::anyhow!(
                    "DOCUMENT_STORE_PATH must be set when STORAGE_BACKEND=local"
                ));
            }
        }

        if self.is_production() && self.storage_backend == StorageBackend::Memory {
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND=memory loses every save on exit and is not allowed in production"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
