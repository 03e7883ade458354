use std::{fs, path::PathBuf};

/// Temporary file path that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Create a path under the system temp dir, unique per test name
    pub fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "bloom_trials_{}_{}",
            std::process::id(),
            test_name
        ));
        Self { path }
    }

    /// Create the file with the given content
    #[allow(dead_code)]
    pub fn with_content(test_name: &str, content: &str) -> Self {
        let file = Self::new(test_name);
        fs::write(&file.path, content).expect("Failed to write test file");
        file
    }

    /// Same as `new`, but as a directory
    #[allow(dead_code)]
    pub fn dir(test_name: &str) -> Self {
        let file = Self::new(test_name);
        fs::create_dir_all(&file.path).expect("Failed to create test dir");
        file
    }

    #[allow(dead_code)]
    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.is_dir() {
            let _ = fs::remove_dir_all(&self.path);
        } else if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
