//! Cold start: make sure every candidate item has a backing arm before
//! selection runs.

use futures::stream::{self, StreamExt, TryStreamExt};

use super::types::ItemKind;
use crate::store::{ArmStore, StoreError};

/// Upserts an arm per candidate id with bounded concurrency. Each upsert
/// is create-if-absent at the store, so repeated or overlapping cold
/// starts never reset an existing arm.
pub async fn ensure_arms(
    store: &ArmStore,
    learner_id: &str,
    kind: ItemKind,
    item_ids: &[String],
    concurrency: usize,
) -> Result<(), StoreError> {
    stream::iter(item_ids)
        .map(|item_id| store.ensure_arm(learner_id, kind, item_id))
        .buffer_unordered(concurrency.max(1))
        .try_collect::<Vec<()>>()
        .await?;
    Ok(())
}
