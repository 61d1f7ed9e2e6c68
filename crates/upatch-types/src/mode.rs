use std::fmt;

use serde::{Deserialize, Serialize};

/// Entry mode of a file: type and permission bits.
///
/// Rendered in octal without a leading zero, the way git prints
/// `new file mode 100644`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMode(u32);

impl FileMode {
    /// Regular, non-executable file.
    pub const REGULAR: Self = Self(0o100644);
    /// Regular file with the executable bit set.
    pub const EXECUTABLE: Self = Self(0o100755);
    /// Symbolic link.
    pub const SYMLINK: Self = Self(0o120000);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }
}

impl Default for FileMode {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileMode({:o})", self.0)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}
