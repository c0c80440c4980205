pub const DEFAULT_CLUSTER_NAME: &str = "cluster-manager";
pub const DEFAULT_CALL_PATH: &str = "/ip";
pub const DEFAULT_CALL_AUTHORITY: &str = "";
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 50_000;
pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;
pub const DEFAULT_DISPATCHES_PER_EVENT: u32 = 1;
