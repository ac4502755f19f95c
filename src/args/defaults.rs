/// Pseudo path naming standard input.
pub const STDIN: &str = "stdin";
/// Pseudo path naming standard output.
pub const STDOUT: &str = "stdout";

pub(crate) const DEFAULT_RATE: u64 = 50;
pub(crate) const DEFAULT_DURATION: &str = "10s";
pub(crate) const DEFAULT_TIMEOUT: &str = "30s";

/// Config files picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["stress.toml", "stress.json"];
