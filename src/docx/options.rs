/// Configuration for unpacking a .docx container.
///
/// # Examples
///
/// ```rust
/// use docxpack::UnpackOptions;
///
/// // Defaults: no size caps, 4 MiB write buffer
/// let options = UnpackOptions::default();
///
/// // Or harden against oversized archives
/// let options = UnpackOptions::new()
///     .with_max_media_size(16 * 1024 * 1024)
///     .with_max_total_media_size(64 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Initial capacity of the media name index
    pub media_capacity: usize,
    /// Capacity reserved for the write buffer of the produced model
    pub write_buffer_capacity: usize,
    /// Largest single media entry accepted, in bytes (`None` = unlimited)
    pub max_media_size: Option<u64>,
    /// Largest combined size of all media entries, in bytes (`None` = unlimited)
    pub max_total_media_size: Option<u64>,
}

/// Default capacity of the media name index.
pub const DEFAULT_MEDIA_CAPACITY: usize = 64;

/// Default write buffer capacity (4 MiB).
pub const DEFAULT_WRITE_BUFFER_CAPACITY: usize = 4 * 1024 * 1024;

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            media_capacity: DEFAULT_MEDIA_CAPACITY,
            write_buffer_capacity: DEFAULT_WRITE_BUFFER_CAPACITY,
            max_media_size: None,
            max_total_media_size: None,
        }
    }
}

impl UnpackOptions {
    /// Create a new `UnpackOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial capacity of the media name index.
    #[inline]
    pub fn with_media_capacity(mut self, capacity: usize) -> Self {
        self.media_capacity = capacity;
        self
    }

    /// Set the capacity reserved for the write buffer.
    #[inline]
    pub fn with_write_buffer_capacity(mut self, capacity: usize) -> Self {
        self.write_buffer_capacity = capacity;
        self
    }

    /// Cap the size of any single media entry.
    #[inline]
    pub fn with_max_media_size(mut self, bytes: u64) -> Self {
        self.max_media_size = Some(bytes);
        self
    }

    /// Cap the combined size of all media entries.
    #[inline]
    pub fn with_max_total_media_size(mut self, bytes: u64) -> Self {
        self.max_total_media_size = Some(bytes);
        self
    }

    /// Byte limit for the next media entry, given what is already buffered.
    pub(crate) fn media_limit(&self, buffered: u64) -> Option<u64> {
        let remaining = self
            .max_total_media_size
            .map(|total| total.saturating_sub(buffered));
        match (self.max_media_size, remaining) {
            (Some(single), Some(remaining)) => Some(single.min(remaining)),
            (single, remaining) => single.or(remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = UnpackOptions::new();
        assert_eq!(options.media_capacity, 64);
        assert_eq!(options.write_buffer_capacity, 4 * 1024 * 1024);
        assert_eq!(options.media_limit(1_000_000), None);
    }

    #[test]
    fn test_media_limit() {
        let single = UnpackOptions::new().with_max_media_size(100);
        assert_eq!(single.media_limit(5000), Some(100));

        let total = UnpackOptions::new().with_max_total_media_size(150);
        assert_eq!(total.media_limit(0), Some(150));
        assert_eq!(total.media_limit(120), Some(30));
        assert_eq!(total.media_limit(200), Some(0));

        let both = single.with_max_total_media_size(150);
        assert_eq!(both.media_limit(0), Some(100));
        assert_eq!(both.media_limit(120), Some(30));
    }
}
