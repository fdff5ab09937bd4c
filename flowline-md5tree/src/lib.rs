//! MD5 digests of a directory tree, computed by a three-stage flowline
//! pipeline: a walker source, a hashing mapper and a collecting sink.

mod cli;
mod collect;
mod digest;
mod walk;

pub use cli::{init_tracing, Args};
pub use collect::{Sums, SumsTable};
pub use digest::{md5sum, Sum};
pub use walk::Walker;

use flowline::stages::{Mapper, Stage};
use flowline::{run, Scope};
use std::path::PathBuf;

/// Hashes every regular file under `root` with `spread` concurrent hashing
/// workers.
///
/// Returns `(path, digest)` pairs sorted by path, or the first error any
/// stage reported. The caller owns `scope` and decides whether to cancel it
/// after a failure.
pub async fn md5_all(
    scope: &Scope,
    root: PathBuf,
    spread: usize,
) -> anyhow::Result<Vec<(PathBuf, [u8; 16])>> {
    let walk = Stage::<(), PathBuf>::source(Walker::new(root)).with_name("walk");
    let hash = Stage::<PathBuf, Sum>::new(walk, Mapper::<PathBuf, Sum, _>::new(md5sum))
        .with_name("md5")
        .with_spread(spread);

    let sums = Sums::default();
    let table = sums.table();
    let collect = Stage::<Sum, ()>::new(hash, sums).with_name("collect");

    run(scope, Some(&collect)).await?;
    Ok(table.sorted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const HELLO: &str = "5d41402abc4b2a76b9719d911017c592";
    const EMPTY: &str = "d41d8cd98f00b204e9800998ecf8427e";

    #[tokio::test]
    async fn test_md5_all_hashes_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), "").unwrap();

        let scope = Scope::new();
        let sums = md5_all(&scope, dir.path().to_path_buf(), 4).await.unwrap();

        let rendered: Vec<(PathBuf, String)> = sums
            .into_iter()
            .map(|(path, digest)| (path, hex::encode(digest)))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (dir.path().join("a.txt"), HELLO.to_string()),
                (dir.path().join("sub").join("b.txt"), EMPTY.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_md5_all_empty_tree() {
        let dir = tempfile::tempdir().unwrap();

        let scope = Scope::new();
        assert!(md5_all(&scope, dir.path().to_path_buf(), 64).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_md5_all_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let scope = Scope::new();
        let err = md5_all(&scope, missing, 2).await.unwrap_err();
        scope.cancel();
        assert!(format!("{err:#}").contains("missing"));
    }
}
