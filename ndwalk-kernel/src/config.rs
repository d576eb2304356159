//! Walk constants and runtime configuration.

/// Highest rank with a dedicated [`crate::Ranked`] walker. Larger ranks use
/// [`crate::Generic`].
pub const MAX_SPECIALIZED_RANK: usize = 8;

/// Tile size of the blocked walker, in bytes.
pub const BLOCK_SIZE_IN_BYTES: usize = 64;

/// Tile size of the blocked walker, in elements, for 8-byte elements.
pub const BLOCK_SIZE_IN_ELEMENTS: usize = 8;

/// Minimum number of elements before the parallel ops split work.
pub const MINTHREADLENGTH: usize = 1 << 15;

/// Runtime switches for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
    /// Drop size-1 dimensions and merge dimensions that are contiguous for
    /// every view. Never changes the visit sequence.
    pub fuse: bool,
    /// Walk in cache-sized tiles. Visits the same positions in a different
    /// sequence.
    pub blocked: bool,
    /// Tile size in bytes for the blocked walker.
    pub block_bytes: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            fuse: true,
            blocked: false,
            block_bytes: BLOCK_SIZE_IN_BYTES,
        }
    }
}

impl WalkConfig {
    /// Read `NDWALK_NO_FUSE`, `NDWALK_BLOCKED` and `NDWALK_BLOCK_BYTES`.
    ///
    /// Flags are on when set to `1`. Unparsable or zero byte counts keep the
    /// default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| matches!(get(key), Some(ref v) if v == "1");
        let mut config = Self::default();
        if flag("NDWALK_NO_FUSE") {
            config.fuse = false;
        }
        if flag("NDWALK_BLOCKED") {
            config.blocked = true;
        }
        if let Some(bytes) = get("NDWALK_BLOCK_BYTES").and_then(|v| v.trim().parse::<usize>().ok()) {
            if bytes > 0 {
                config.block_bytes = bytes;
            }
        }
        config
    }

    /// Tile extent, in elements, for elements of `elem_size` bytes. An
    /// unknown size (0) is taken to be 8 bytes.
    pub fn block_len(&self, elem_size: usize) -> usize {
        let elem_size = if elem_size == 0 {
            BLOCK_SIZE_IN_BYTES / BLOCK_SIZE_IN_ELEMENTS
        } else {
            elem_size
        };
        (self.block_bytes / elem_size).max(1)
    }
}
