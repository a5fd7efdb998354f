//! Unified exit codes for hintprobe. Part of the CLI contract; scripts
//! branch on these.

pub const SUCCESS: i32 = 0;
/// Run completed but one or more trials errored (provider failures).
pub const EVAL_ERRORS: i32 = 1;
/// Bad arguments, missing API key, unreadable or gated dataset.
pub const CONFIG_ERROR: i32 = 2;
/// Infrastructure failure before any trial ran (dataset fetch, network).
pub const INFRA_ERROR: i32 = 3;
