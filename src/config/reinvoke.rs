//! Scheduler tunables.

use serde::{Deserialize, Serialize};

const ENV_LOCAL_WAIT_CEILING: &str = "REINVOKE_LOCAL_WAIT_CEILING_SECS";
const ENV_SAFETY_MARGIN: &str = "REINVOKE_SAFETY_MARGIN";
const ENV_MIN_EXTERNAL_DELAY: &str = "REINVOKE_MIN_EXTERNAL_DELAY_SECS";
const ENV_COMPENSATE: &str = "REINVOKE_COMPENSATE_ON_BIND_FAILURE";
const ENV_LOG_FILTER: &str = "REINVOKE_LOG_FILTER";

/// Reinvocation scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinvokeConfig {
    /// Delays strictly below this may be waited out in-process. Capped at
    /// `min_external_delay_secs`.
    pub local_wait_ceiling_secs: i64,
    /// Remaining budget must exceed `delay * safety_margin` to wait locally.
    pub safety_margin: f64,
    /// Earliest the external scheduler can fire.
    pub min_external_delay_secs: i64,
    /// Delete the freshly created rule when binding its target fails.
    pub compensate_on_bind_failure: bool,
    /// Default tracing directive when `RUST_LOG` is unset. Applied by
    /// [`init_tracing_from`](crate::util::init_tracing_from).
    pub log_filter: String,
}

impl Default for ReinvokeConfig {
    fn default() -> Self {
        Self {
            local_wait_ceiling_secs: 60,
            safety_margin: 1.2,
            min_external_delay_secs: 60,
            compensate_on_bind_failure: false,
            log_filter: "info".into(),
        }
    }
}

impl ReinvokeConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.local_wait_ceiling_secs <= 0 {
            return Err("local_wait_ceiling_secs must be greater than 0".into());
        }
        if !self.safety_margin.is_finite() || self.safety_margin < 1.0 {
            return Err("safety_margin must be a finite value >= 1.0".into());
        }
        // The external scheduler is minute-granular.
        if self.min_external_delay_secs < 60 {
            return Err("min_external_delay_secs must be at least 60".into());
        }
        // Anything the store can take over must not be waited out in-process.
        if self.local_wait_ceiling_secs > self.min_external_delay_secs {
            return Err("local_wait_ceiling_secs must not exceed min_external_delay_secs".into());
        }
        if self.log_filter.trim().is_empty() {
            return Err("log_filter must not be empty".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `REINVOKE_*` environment variables, loading a
    /// `.env` file first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_LOCAL_WAIT_CEILING) {
            cfg.local_wait_ceiling_secs = parse_var(ENV_LOCAL_WAIT_CEILING, &v)?;
        }
        if let Some(v) = lookup(ENV_SAFETY_MARGIN) {
            cfg.safety_margin = parse_var(ENV_SAFETY_MARGIN, &v)?;
        }
        if let Some(v) = lookup(ENV_MIN_EXTERNAL_DELAY) {
            cfg.min_external_delay_secs = parse_var(ENV_MIN_EXTERNAL_DELAY, &v)?;
        }
        if let Some(v) = lookup(ENV_COMPENSATE) {
            cfg.compensate_on_bind_failure = parse_var(ENV_COMPENSATE, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_FILTER) {
            cfg.log_filter = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| format!("{key}: {e}"))
}
