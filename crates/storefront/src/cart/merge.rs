//! Pushing the guest cart into the server cart after sign-in.
//!
//! Items are sent one at a time, in cart order, and each request finishes
//! before the next begins. Individual failures are logged and reported but
//! do not abort the merge. The local cart is always cleared afterwards, so a
//! repeated sign-in never pushes the same items twice.

use shopfront_core::{GuestCartItem, ProductId};
use tracing::instrument;

use super::GuestCartStore;
use crate::api::{AuthToken, CartApi};
use crate::storage::KeyValueStore;
use crate::tasks::run_in_order;

/// Result of pushing a single guest cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Error message when the server rejected the line.
    pub error: Option<String>,
}

/// Per-line results of a merge, in cart order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub outcomes: Vec<MergeOutcome>,
}

impl MergeReport {
    /// Number of lines the server accepted.
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    /// Lines the server rejected.
    pub fn failed(&self) -> impl Iterator<Item = &MergeOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    /// True when every line was accepted (including the empty merge).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl<S: KeyValueStore> GuestCartStore<S> {
    /// Push every guest cart line into the signed-in user's server cart, then
    /// clear the guest cart.
    ///
    /// An empty guest cart issues no requests.
    #[instrument(skip(self, api, token))]
    pub async fn merge_into_server_cart<A: CartApi>(
        &self,
        api: &A,
        token: &AuthToken,
    ) -> MergeReport {
        let items = self.load().items().to_vec();
        if items.is_empty() {
            return MergeReport::default();
        }

        let results = run_in_order(items, |item: &GuestCartItem| {
            let product_id = item.product_id.clone();
            let quantity = item.quantity;
            async move { api.add_to_cart(token, &product_id, quantity).await }
        })
        .await;

        let outcomes: Vec<MergeOutcome> = results
            .into_iter()
            .map(|task| {
                let error = task.result.err().map(|e| {
                    tracing::warn!(
                        product_id = %task.input.product_id,
                        quantity = task.input.quantity,
                        error = %e,
                        "Failed to merge guest cart item"
                    );
                    e.to_string()
                });
                MergeOutcome {
                    product_id: task.input.product_id,
                    quantity: task.input.quantity,
                    error,
                }
            })
            .collect();

        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "Failed to clear guest cart after merge");
        }

        let report = MergeReport { outcomes };
        tracing::info!(
            merged = report.merged_count(),
            total = report.outcomes.len(),
            "Guest cart merged"
        );
        report
    }
}
