//! Reference resolution and repair
//!
//! Projects are supposed to reference assets by stable id, but data
//! predating that rule references them by raw locator URL. The resolver
//! tolerates and heals both: lookups and rewrites match ids and full
//! locator strings by default, and an explicit legacy mode additionally
//! rewrites locators that merely *contain* the old locator. Substring
//! matching is heuristic, so every such rewrite is logged for audit and
//! the mode is never the default.

use anyhow::Result;
use std::sync::Arc;

use crate::storage::ids::ProjectId;
use crate::storage::traits::ProjectStore;
use crate::storage::types::{AssetRef, StoredProject};

/// Default number of projects loaded per repair batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// How locator refs are matched during repair
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Ids and full locator strings only
    #[default]
    Exact,
    /// Additionally rewrite locators containing the old locator as a
    /// substring; each such rewrite is logged
    LegacySubstring,
}

/// Outcome of a repair pass
///
/// Failures are collected, not thrown: each failed project id names a
/// record whose rewrite did not persist. Re-running the same repair
/// retries exactly those records, because already-repaired projects no
/// longer match.
#[derive(Clone, Debug, Default)]
pub struct RepairReport {
    /// Projects whose refs were rewritten and persisted
    pub updated: usize,
    /// Projects whose rewrite failed to persist
    pub failed_ids: Vec<ProjectId>,
}

impl RepairReport {
    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// Finds and repairs project references to an asset
pub struct ReferenceResolver<P: ProjectStore> {
    projects: Arc<P>,
    batch_size: usize,
}

impl<P: ProjectStore> ReferenceResolver<P> {
    pub fn new(projects: Arc<P>) -> Self {
        Self { projects, batch_size: DEFAULT_BATCH_SIZE }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ids of *active* projects holding a ref that matches the target
    /// exactly
    ///
    /// Used by delete to enforce the reference-free invariant; substring
    /// matching is deliberately excluded here so a false positive can
    /// never block (or worse, unblock) a delete.
    pub async fn resolve_referrers(&self, target: &AssetRef) -> Result<Vec<ProjectId>> {
        let mut referrers = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.projects.list_page(offset, self.batch_size).await?;
            if page.is_empty() {
                break;
            }
            offset += page.len();
            for stored in &page {
                if stored.is_active() && stored.project.refers_to(target) {
                    referrers.push(stored.id.clone());
                }
            }
        }
        Ok(referrers)
    }

    /// Rewrite every ref matching `old` to `new`
    ///
    /// Processes projects in bounded batches; each project's write is
    /// independent and durable, so a failure partway corrupts nothing that
    /// was already written. Idempotent: once a project is rewritten it no
    /// longer matches, so a second pass updates zero records.
    pub async fn repair_references(
        &self,
        old: &AssetRef,
        new: &AssetRef,
        mode: MatchMode,
    ) -> Result<RepairReport> {
        let mut report = RepairReport::default();
        let mut offset = 0;
        loop {
            let page = self.projects.list_page(offset, self.batch_size).await?;
            if page.is_empty() {
                break;
            }
            offset += page.len();
            for stored in page {
                self.repair_project(&stored, old, new, mode, &mut report).await;
            }
        }

        tracing::info!(
            old = %old,
            new = %new,
            updated = report.updated,
            failed = report.failed_ids.len(),
            "reference repair pass finished"
        );
        Ok(report)
    }

    async fn repair_project(
        &self,
        stored: &StoredProject,
        old: &AssetRef,
        new: &AssetRef,
        mode: MatchMode,
        report: &mut RepairReport,
    ) {
        let mut changed = false;
        let main_asset = self.rewrite_ref(&stored.id, &stored.project.main_asset, old, new, mode, &mut changed);
        let assets: Vec<AssetRef> = stored
            .project
            .assets
            .iter()
            .map(|r| self.rewrite_ref(&stored.id, r, old, new, mode, &mut changed))
            .collect();

        if !changed {
            return;
        }

        match self.projects.update_refs(&stored.id, main_asset, assets).await {
            Ok(true) => report.updated += 1,
            Ok(false) => {
                // Deleted out from under us between page load and write.
                tracing::warn!(project = %stored.id, "project vanished during repair");
            }
            Err(e) => {
                tracing::warn!(project = %stored.id, error = %e, "reference rewrite failed to persist");
                report.failed_ids.push(stored.id.clone());
            }
        }
    }

    fn rewrite_ref(
        &self,
        project: &ProjectId,
        current: &AssetRef,
        old: &AssetRef,
        new: &AssetRef,
        mode: MatchMode,
        changed: &mut bool,
    ) -> AssetRef {
        if current.matches(old) {
            *changed = true;
            return new.clone();
        }

        if mode == MatchMode::LegacySubstring {
            if let (Some(old_locator), Some(current_locator)) = (old.as_locator(), current.as_locator()) {
                if current_locator.contains(old_locator) {
                    let rewritten = current_locator.replace(old_locator, &new.to_string());
                    tracing::warn!(
                        project = %project,
                        old = %current_locator,
                        new = %rewritten,
                        "substring-matched legacy reference rewritten"
                    );
                    *changed = true;
                    return AssetRef::parse(&rewritten);
                }
            }
        }

        current.clone()
    }
}
