//! Service configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{Timezone, EPSILON};
use domain_settlement::{ImbalancePolicy, SettlementOptions, IMBALANCE_TOLERANCE};

use crate::error::ServiceError;
use crate::telemetry::LogFormat;

/// Environment variable prefix, e.g. `SETTLE_TIMEZONE`
pub const ENV_PREFIX: &str = "SETTLE";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Threshold below which balances and transfers count as zero
    pub epsilon: Decimal,
    /// Largest tolerated net total of a group's balances
    pub imbalance_tolerance: Decimal,
    /// What to do when balances do not net to zero
    pub imbalance_policy: ImbalancePolicy,
    /// Zone used for calendar days and months in insights
    pub timezone: Timezone,
    /// Log filter directive, e.g. `info` or `domain_settlement=debug`
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            imbalance_tolerance: IMBALANCE_TOLERANCE,
            imbalance_policy: ImbalancePolicy::Warn,
            timezone: Timezone::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from `SETTLE_`-prefixed environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Reads `.env` if present, then the environment, then validates
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the tunables are usable
    ///
    /// # Errors
    ///
    /// `ServiceError::Configuration` if epsilon is not positive or the
    /// imbalance tolerance is below epsilon.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.epsilon <= Decimal::ZERO {
            return Err(ServiceError::Configuration(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.imbalance_tolerance < self.epsilon {
            return Err(ServiceError::Configuration(format!(
                "imbalance_tolerance {} must not be below epsilon {}",
                self.imbalance_tolerance, self.epsilon
            )));
        }
        Ok(())
    }

    pub fn settlement_options(&self) -> SettlementOptions {
        SettlementOptions {
            epsilon: self.epsilon,
            imbalance_tolerance: self.imbalance_tolerance,
            imbalance_policy: self.imbalance_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settlement_options(), SettlementOptions::default());
    }

    #[test]
    fn test_rejects_zero_epsilon() {
        let config = ServiceConfig {
            epsilon: dec!(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn test_rejects_tolerance_below_epsilon() {
        let config = ServiceConfig {
            imbalance_tolerance: dec!(0.001),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserializes_strings() {
        let source = config::Config::builder()
            .set_override("timezone", "Europe/Berlin")
            .unwrap()
            .set_override("imbalance_policy", "reject")
            .unwrap()
            .set_override("epsilon", "0.005")
            .unwrap()
            .set_override("log_format", "json")
            .unwrap()
            .build()
            .unwrap();
        let config: ServiceConfig = source.try_deserialize().unwrap();

        assert_eq!(config.timezone.name(), "Europe/Berlin");
        assert_eq!(config.imbalance_policy, ImbalancePolicy::Reject);
        assert_eq!(config.epsilon, dec!(0.005));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.imbalance_tolerance, IMBALANCE_TOLERANCE);
    }
}
