use std::path::{Component, Path, PathBuf};

/// Scratch directory for a test under the cargo target tmpdir.
#[derive(Debug, Clone)]
pub struct TestFs {
    root: PathBuf,
}

#[allow(unused)]
impl TestFs {
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut root = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
            .join("dupcheck")
            .join("testout");
        root.push(normalize(path.as_ref()));
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `contents` to `path` and returns the full path.
    pub fn write(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> PathBuf {
        let full = self.join_path(path);
        std::fs::write(&full, contents).expect("failed writing test input");
        full
    }

    pub fn join_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(normalize(path.as_ref()))
    }
}

/// Keeps only the normal components of `path` so that it stays under the root.
fn normalize(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref()
        .components()
        .filter_map(|component| match component {
            Component::Normal(p) => Some(p),
            _ => None,
        })
        .collect()
}
