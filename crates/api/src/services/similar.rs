//! Similar-product selection for a product page.
//!
//! Candidates come from the source product's category in two tiers. The
//! primary tier keeps candidates listed within ±20% of the source's average
//! listed price, with a matching brand (when the source has one) and at least
//! one shared name keyword. The back-fill tier tops the result up with other
//! same-category products, ignoring those filters. Both tiers are ordered by
//! product id, so results are stable across requests.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use basketwatch_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::Product;

/// Number of similar products returned when the caller doesn't ask for a
/// specific count.
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Service selecting similar products.
pub struct SimilarProductsService<'a> {
    pool: &'a PgPool,
}

impl<'a> SimilarProductsService<'a> {
    /// Create a new similar-products service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Select up to `limit` products similar to the given one.
    ///
    /// Returns `None` when the source product doesn't exist. A product
    /// without a category has no candidate pool and yields an empty result.
    /// A product without listings has no average price, so the primary tier
    /// matches nothing and only the back-fill applies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a candidate query fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn similar_to(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Option<Vec<Product>>, RepositoryError> {
        let repo = ProductRepository::new(self.pool);

        let Some(source) = repo.get(product_id).await? else {
            return Ok(None);
        };
        let Some(category_id) = source.category_id else {
            return Ok(Some(Vec::new()));
        };

        let mut selected: Vec<Product> = Vec::new();
        if let Some(average) = repo.average_listed_price(product_id).await? {
            let (min_price, max_price) = price_band(average);
            let keywords = name_keywords(&source.name);
            let candidates = repo
                .category_peers_in_price_band(category_id, product_id, min_price, max_price)
                .await?;

            selected = candidates
                .into_iter()
                .filter(|candidate| {
                    brand_matches(source.brand.as_deref(), candidate.brand.as_deref())
                })
                .filter(|candidate| shares_keyword(&candidate.name, &keywords))
                .take(limit)
                .collect();
        }

        if selected.len() < limit {
            let mut exclude: Vec<ProductId> = selected.iter().map(|p| p.id).collect();
            exclude.push(product_id);
            let remaining = i64::try_from(limit - selected.len()).unwrap_or(i64::MAX);
            let backfill = repo.category_peers(category_id, &exclude, remaining).await?;
            selected.extend(backfill);
        }

        Ok(Some(selected))
    }
}

/// Bounds of the ±20% band around an average price.
fn price_band(average: Decimal) -> (Decimal, Decimal) {
    (average * Decimal::new(8, 1), average * Decimal::new(12, 1))
}

/// Lowercased whitespace-separated name tokens of length >= 3.
fn name_keywords(name: &str) -> Vec<String> {
    name.split_whitespace()
        .filter(|token| token.len() >= 3)
        .map(str::to_lowercase)
        .collect()
}

/// Whether `name` contains any of the keywords, case-insensitively.
fn shares_keyword(name: &str, keywords: &[String]) -> bool {
    let lowered = name.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Brand filter: when the source has a brand, the candidate's must equal it
/// case-insensitively; a source without a brand accepts everything.
fn brand_matches(source: Option<&str>, candidate: Option<&str>) -> bool {
    source.is_none_or(|s| candidate.is_some_and(|c| c.eq_ignore_ascii_case(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_price_band_is_twenty_percent_each_way() {
        let (min, max) = price_band(price("10.00"));
        assert_eq!(min, price("8.000"));
        assert_eq!(max, price("12.000"));
    }

    #[test]
    fn test_name_keywords_drop_short_tokens_and_lowercase() {
        assert_eq!(
            name_keywords("Whole Milk 1L"),
            vec!["whole".to_string(), "milk".to_string()]
        );
        assert!(name_keywords("a b if").is_empty());
    }

    #[test]
    fn test_shares_keyword_matches_substrings_case_insensitively() {
        let keywords = name_keywords("Whole Milk");
        assert!(shares_keyword("Semi-Skimmed MILK 2L", &keywords));
        assert!(shares_keyword("wholemeal bread", &keywords));
        assert!(!shares_keyword("Orange Juice", &keywords));
    }

    #[test]
    fn test_no_keywords_means_no_keyword_match() {
        assert!(!shares_keyword("Anything", &[]));
    }

    #[test]
    fn test_brand_matches_requires_equality_only_when_source_is_branded() {
        assert!(brand_matches(None, Some("Acme")));
        assert!(brand_matches(None, None));
        assert!(brand_matches(Some("Acme"), Some("acme")));
        assert!(!brand_matches(Some("Acme"), Some("Other")));
        assert!(!brand_matches(Some("Acme"), None));
    }
}
