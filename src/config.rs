//! Engine configuration.

/// Page size used by `scan`/`sscan` when the caller gives no `COUNT`.
pub const DEFAULT_SCAN_COUNT: usize = 10;

/// Settings applied when an [`Engine`](crate::commands::Engine) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorConfig {
    /// Storage area a fresh engine is bound to (default: the empty name)
    pub default_storage: String,

    /// Default page size for cursor iteration
    pub scan_count: usize,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            default_storage: String::new(),
            scan_count: DEFAULT_SCAN_COUNT,
        }
    }
}

impl EmulatorConfig {
    /// Binds new engines to the given storage area.
    pub fn with_storage(mut self, name: impl Into<String>) -> Self {
        self.default_storage = name.into();
        self
    }

    /// Overrides the default scan page size. Zero is bumped to one.
    pub fn with_scan_count(mut self, count: usize) -> Self {
        self.scan_count = count.max(1);
        self
    }
}
