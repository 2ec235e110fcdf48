/// Read-only key/value configuration, as loaded from the platform ini.
pub trait ConfigSource: Send + Sync {
    /// Raw integer value stored under `key`, if any.
    fn get_u32(&self, key: &str) -> Option<u32>;
}
