//! The hashing stage.

use anyhow::Context;
use flowline::Scope;
use md5::{Digest, Md5};
use std::path::PathBuf;

/// The MD5 digest of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sum {
    /// The hashed file.
    pub path: PathBuf,
    /// Its digest.
    pub digest: [u8; 16],
}

/// Reads the file at `path` and computes its digest.
pub async fn md5sum(_scope: Scope, path: PathBuf) -> anyhow::Result<Sum> {
    let body = tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    Ok(Sum {
        digest: Md5::digest(&body).into(),
        path,
    })
}
