use std::sync::Arc;

use url::Url;

use crate::codegen::{is_reserved_code, is_valid_short_code, CodeGenerator, RandomCodeGenerator};
use crate::error::{LinkError, LinkResult};
use crate::models::LinkRecord;
use crate::storage::{Storage, StorageError};

/// Retry bound for auto-generated codes.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

const INVALID_URL: &str = "Invalid URL format";
const INVALID_CODE: &str = "Short code must be 6-8 alphanumeric characters";

/// Create, read, list and delete operations over the link directory.
///
/// Stateless apart from its handles, so a single instance is shared across
/// all requests.
pub struct LinkService {
    storage: Arc<dyn Storage>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: u32,
}

impl LinkService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_generator(storage, Arc::new(RandomCodeGenerator), DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_generator(
        storage: Arc<dyn Storage>,
        generator: Arc<dyn CodeGenerator>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a link, either under `requested_code` or a freshly generated one.
    ///
    /// An explicitly requested code is tried exactly once: if it is taken, or
    /// reserved for a fixed route, the caller gets [`LinkError::CodeTaken`]. Generated codes are retried on
    /// collision up to `max_attempts` times before giving up with
    /// [`LinkError::GenerationExhausted`].
    pub async fn create_link(
        &self,
        url: &str,
        requested_code: Option<&str>,
    ) -> LinkResult<LinkRecord> {
        validate_url(url)?;

        if let Some(code) = requested_code {
            if !is_valid_short_code(code) {
                return Err(LinkError::InvalidInput(INVALID_CODE.to_string()));
            }

            // Reserved segments are shadowed by fixed routes and could never redirect
            if is_reserved_code(code) {
                return Err(LinkError::CodeTaken);
            }

            let record = self.storage.put(code, url).await?;
            tracing::info!(short_code = %record.short_code, "created link with requested code");
            return Ok(record);
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();
            if is_reserved_code(&candidate) {
                tracing::debug!(short_code = %candidate, attempt, "generated reserved code, retrying");
                continue;
            }
            match self.storage.put(&candidate, url).await {
                Ok(record) => {
                    tracing::info!(short_code = %record.short_code, attempt, "created link");
                    return Ok(record);
                }
                Err(StorageError::Conflict) => {
                    tracing::debug!(short_code = %candidate, attempt, "generated code collided, retrying");
                }
                Err(err) => return Err(LinkError::StorageFailure(err)),
            }
        }

        tracing::error!(attempts = self.max_attempts, "exhausted short code generation attempts");
        Err(LinkError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    pub async fn get_link(&self, code: &str) -> LinkResult<LinkRecord> {
        Ok(self.storage.get(code).await?)
    }

    pub async fn list_links(&self) -> LinkResult<Vec<LinkRecord>> {
        Ok(self.storage.list_all().await?)
    }

    pub async fn delete_link(&self, code: &str) -> LinkResult<()> {
        self.storage.remove(code).await?;
        tracing::info!(short_code = %code, "deleted link");
        Ok(())
    }

    /// Count one click against `code`; see [`Storage::record_click`].
    pub async fn record_click(&self, code: &str) -> LinkResult<LinkRecord> {
        Ok(self.storage.record_click(code).await?)
    }
}

/// `Url::parse` only succeeds on absolute URLs; any scheme is accepted.
fn validate_url(raw: &str) -> LinkResult<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|_| LinkError::InvalidInput(INVALID_URL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?q=1#frag").is_ok());
        assert!(validate_url("https://sub.example.co.uk:8443/a/b").is_ok());
        assert!(validate_url("ftp://example.com/file").is_ok());
        assert!(validate_url("mailto:user@example.com").is_ok());

        assert!(validate_url("").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("/relative/path").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_storage_errors_map_into_taxonomy() {
        assert!(matches!(
            LinkError::from(StorageError::NotFound),
            LinkError::NotFound
        ));
        assert!(matches!(
            LinkError::from(StorageError::Conflict),
            LinkError::CodeTaken
        ));
        assert!(matches!(
            LinkError::from(StorageError::Timeout(std::time::Duration::from_secs(1))),
            LinkError::StorageFailure(_)
        ));
    }
}
