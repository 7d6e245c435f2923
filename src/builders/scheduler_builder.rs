//! Builder for [`ReinvocationScheduler`].

use crate::config::ReinvokeConfig;
use crate::core::{AuditSink, ReinvocationScheduler, SchedulerError, TriggerStore};
use crate::util::clock::{Clock, SystemClock};

/// Assembles a scheduler from a store, a clock, configuration, and an
/// optional audit sink, validating the configuration on `build`.
pub struct SchedulerBuilder<S, C = SystemClock> {
    store: S,
    clock: C,
    config: ReinvokeConfig,
    audit: Option<Box<dyn AuditSink>>,
}

impl<S: TriggerStore> SchedulerBuilder<S> {
    /// Start from a trigger store with default configuration and the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            config: ReinvokeConfig::default(),
            audit: None,
        }
    }
}

impl<S: TriggerStore, C: Clock> SchedulerBuilder<S, C> {
    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ReinvokeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SchedulerBuilder<S, C2> {
        SchedulerBuilder {
            store: self.store,
            clock,
            config: self.config,
            audit: self.audit,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Configuration that `build` will validate.
    pub const fn config(&self) -> &ReinvokeConfig {
        &self.config
    }

    /// Validate configuration and build the scheduler.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Config` when validation fails.
    pub fn build(self) -> Result<ReinvocationScheduler<S, C>, SchedulerError> {
        self.config.validate().map_err(SchedulerError::Config)?;
        let scheduler = ReinvocationScheduler::with_parts(self.store, self.clock, self.config);
        Ok(match self.audit {
            Some(audit) => scheduler.with_audit(audit),
            None => scheduler,
        })
    }
}
