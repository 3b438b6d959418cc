/// Configuration default values
///
/// All default values for configuration options live here so they can be
/// changed in one central location.
// Filtering defaults
pub const DEFAULT_SKIP_BUILTIN_FILTER: bool = false;
pub const DEFAULT_FIELD_ENABLED: bool = true;

// Engine defaults
/// Batches at least this large are evaluated on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

// CLI defaults
pub const DEFAULT_CONFIG_FILE: &str = "epg-matcher.toml";
/// Environment variable naming the config file when `--config` is not given
pub const CONFIG_FILE_ENV: &str = "EPG_MATCHER_CONFIG";
pub const DEFAULT_LOG_LEVEL: &str = "info";
