//! Release archive fixtures.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone)]
enum Entry {
    File {
        name: String,
        content: Vec<u8>,
        mode: Option<u32>,
    },
    Directory(String),
}

/// Builder for ZIP archives used as release packages in tests.
///
/// Entry names are written verbatim, including names that try to escape the
/// extraction root, so extraction safety can be tested.
#[derive(Debug, Clone, Default)]
pub struct ZipFixture {
    entries: Vec<Entry>,
}

impl ZipFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file.
    #[must_use]
    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(Entry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: None,
        });
        self
    }

    /// Add a file with mode 0755.
    #[must_use]
    pub fn executable(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(Entry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: Some(0o755),
        });
        self
    }

    /// Add a directory entry (`name` should end with `/`).
    #[must_use]
    pub fn directory(mut self, name: &str) -> Self {
        self.entries.push(Entry::Directory(name.to_string()));
        self
    }

    /// The archive bytes.
    ///
    /// # Panics
    ///
    /// Panics if the archive cannot be written (test-only helper).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            match entry {
                Entry::File {
                    name,
                    content,
                    mode,
                } => {
                    let mut options = SimpleFileOptions::default();
                    if let Some(mode) = mode {
                        options = options.unix_permissions(*mode);
                    }
                    zip.start_file(name.as_str(), options).expect("start zip entry");
                    zip.write_all(content).expect("write zip entry");
                }
                Entry::Directory(name) => {
                    zip.add_directory(name.as_str(), SimpleFileOptions::default())
                        .expect("add zip directory");
                }
            }
        }

        zip.finish().expect("finish zip archive").into_inner()
    }

    /// Write the archive to `path` and return it.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written (test-only helper).
    pub fn write_to(&self, path: &Path) -> PathBuf {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture directory");
        }
        std::fs::write(path, self.to_bytes()).expect("write zip fixture");
        path.to_path_buf()
    }
}
