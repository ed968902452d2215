//! Read and delete side of the admin list view.

use std::cmp::Reverse;
use std::sync::Arc;

use folio_core::constants::PORTFOLIOS_COLLECTION;
use folio_core::{PortfolioRecord, Record};
use folio_storage::{BlobStore, DocumentStore, Subscription};

use crate::error::CatalogError;

/// Portfolio records as the admin list shows them.
pub struct PortfolioCatalog {
    blobs: Arc<dyn BlobStore>,
    documents: Arc<dyn DocumentStore>,
}

impl PortfolioCatalog {
    pub fn new(blobs: Arc<dyn BlobStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { blobs, documents }
    }

    /// Every portfolio, newest `createdAt` first. Records that do not decode are
    /// logged and left out.
    pub async fn list(&self) -> Result<Vec<PortfolioRecord>, CatalogError> {
        let records = self.documents.get_all(PORTFOLIOS_COLLECTION).await?;
        Ok(decode_sorted(records))
    }

    pub async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<PortfolioRecord>, CatalogError> {
        let mut portfolios = self.list().await?;
        portfolios.retain(|p| p.category == category);
        Ok(portfolios)
    }

    /// What the public pages show: the category's enabled portfolios.
    pub async fn list_visible(&self, category: &str) -> Result<Vec<PortfolioRecord>, CatalogError> {
        let mut portfolios = self.list_by_category(category).await?;
        portfolios.retain(PortfolioRecord::is_enabled);
        Ok(portfolios)
    }

    pub async fn get(&self, id: &str) -> Result<Option<PortfolioRecord>, CatalogError> {
        match self.documents.get(PORTFOLIOS_COLLECTION, id).await? {
            Some(record) => decode(record).map(Some),
            None => Ok(None),
        }
    }

    /// Delete a portfolio and, best effort, the blobs it points at.
    ///
    /// Blob failures are logged and do not stop the record delete. URLs this blob
    /// store did not hand out (static assets, other hosts) are left alone.
    pub async fn delete(&self, id: &str) -> Result<PortfolioRecord, CatalogError> {
        let portfolio = self
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        for url in portfolio.image_urls() {
            let Some(path) = self.blobs.path_for_url(url) else {
                tracing::debug!(url = %url, "Skipping blob not owned by this store");
                continue;
            };
            if let Err(e) = self.blobs.delete(&path).await {
                tracing::error!(
                    error = %e,
                    portfolio_id = %id,
                    path = %path,
                    "Failed to delete portfolio image from storage"
                );
            }
        }

        self.documents.delete(PORTFOLIOS_COLLECTION, id).await?;
        tracing::info!(portfolio_id = %id, "Portfolio deleted");
        Ok(portfolio)
    }

    /// Follow the collection; each change yields the full, sorted list.
    pub async fn subscribe(&self) -> Result<CatalogSubscription, CatalogError> {
        let inner = self.documents.subscribe(PORTFOLIOS_COLLECTION).await?;
        Ok(CatalogSubscription { inner })
    }
}

/// Live portfolio list. Dropping it unsubscribes.
pub struct CatalogSubscription {
    inner: Subscription,
}

impl CatalogSubscription {
    /// The next full list; `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Result<Vec<PortfolioRecord>, CatalogError>> {
        self.inner.next().await.map(|records| Ok(decode_sorted(records)))
    }
}

fn decode(record: Record) -> Result<PortfolioRecord, CatalogError> {
    let id = record.id.clone();
    PortfolioRecord::from_record(record).map_err(|source| CatalogError::Malformed { id, source })
}

fn decode_sorted(records: Vec<Record>) -> Vec<PortfolioRecord> {
    let mut portfolios: Vec<PortfolioRecord> = records
        .into_iter()
        .filter_map(|record| match decode(record) {
            Ok(portfolio) => Some(portfolio),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable portfolio record");
                None
            }
        })
        .collect();
    // Records without a creation date sort last; ties keep store (id) order
    portfolios.sort_by_key(|p| Reverse(p.created_at));
    portfolios
}
