use serde::{Deserialize, Serialize};

/// Options for writing and merging database sub-records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Emit value planes; when false they are written as type defaults.
    pub write_data: bool,
    /// Treat a width mismatch on merge as fatal instead of skipping the record.
    pub strict_merge: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            write_data: true,
            strict_merge: true,
        }
    }
}

impl CodecOptions {
    pub fn write_data(mut self, enable: bool) -> Self {
        self.write_data = enable;
        self
    }

    pub fn strict_merge(mut self, enable: bool) -> Self {
        self.strict_merge = enable;
        self
    }
}
