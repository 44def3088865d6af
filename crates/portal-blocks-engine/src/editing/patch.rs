/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// False when the command was a no-op (stale id, out-of-range index).
    pub changed: bool,
    pub version: u64,
}
