//! The collecting stage.

use crate::digest::Sum;
use async_trait::async_trait;
use dashmap::DashMap;
use flowline::stages::{Former, Joint};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared view of collected digests.
#[derive(Debug, Clone, Default)]
pub struct SumsTable {
    map: Arc<DashMap<PathBuf, [u8; 16]>>,
}

impl SumsTable {
    /// Number of collected files.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every `(path, digest)` pair sorted by path.
    pub fn sorted(&self) -> Vec<(PathBuf, [u8; 16])> {
        let mut sums: Vec<_> = self
            .map
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        sums.sort_by(|a, b| a.0.cmp(&b.0));
        sums
    }
}

/// Records every incoming sum into a [`SumsTable`].
#[derive(Debug, Default)]
pub struct Sums {
    table: SumsTable,
}

impl Sums {
    /// A handle to the table the sums go into.
    pub fn table(&self) -> SumsTable {
        self.table.clone()
    }
}

#[async_trait]
impl Former<Sum, ()> for Sums {
    async fn form(&self, joint: &dyn Joint<Sum, ()>) {
        while let Ok(sum) = joint.get().await {
            self.table.map.insert(sum.path, sum.digest);
        }
    }
}
