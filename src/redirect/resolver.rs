use std::sync::Arc;

use crate::codegen::is_valid_short_code;
use crate::error::{LinkError, LinkResult};
use crate::service::LinkService;

/// Turns a short code into its destination, counting the visit.
///
/// Lookup and increment are the same storage call, so a concurrent delete can
/// never leave a half-applied click behind.
#[derive(Clone)]
pub struct RedirectResolver {
    service: Arc<LinkService>,
}

impl RedirectResolver {
    pub fn new(service: Arc<LinkService>) -> Self {
        Self { service }
    }

    pub async fn resolve(&self, code: &str) -> LinkResult<String> {
        // Codes outside the accepted syntax can never have been stored
        if !is_valid_short_code(code) {
            return Err(LinkError::NotFound);
        }

        let record = self.service.record_click(code).await?;
        tracing::debug!(short_code = %code, clicks = record.clicks, "resolved link");
        Ok(record.original_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    fn setup() -> (Arc<dyn Storage>, RedirectResolver) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let service = Arc::new(LinkService::new(Arc::clone(&storage)));
        (storage, RedirectResolver::new(service))
    }

    #[tokio::test]
    async fn test_resolve_counts_click() {
        let (storage, resolver) = setup();
        storage.put("abc123", "https://example.com").await.unwrap();

        let destination = resolver.resolve("abc123").await.unwrap();
        assert_eq!(destination, "https://example.com");

        let record = storage.get("abc123").await.unwrap();
        assert_eq!(record.clicks, 1);
        assert!(record.last_clicked_at.is_some());
    }

    #[tokio::test]
    async fn test_resolve_missing_code_has_no_side_effects() {
        let (storage, resolver) = setup();

        assert!(matches!(
            resolver.resolve("nope99").await,
            Err(LinkError::NotFound)
        ));
        assert!(matches!(
            resolver.resolve("bad!code").await,
            Err(LinkError::NotFound)
        ));
        assert!(storage.list_all().await.unwrap().is_empty());
    }
}
