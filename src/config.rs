use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use validator::{Validate, ValidationError};

use crate::domain::{ParameterSet, StateVector};
use crate::streaming::{RuntimeSettings, SetpointBand, DEFAULT_HISTORY_CAPACITY};

pub const CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "TWIN__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub simulation: SimulationConfig,
    pub parameters: ParameterSet,
    #[validate(nested)]
    pub control: ControlConfig,
    #[validate(nested)]
    pub sensors: SensorsConfig,
    #[validate(nested)]
    pub consumer: ConsumerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// Integration step (s)
    #[validate(range(exclusive_min = 0.0))]
    pub dt_seconds: f64,
    #[validate(range(min = 1))]
    pub history_capacity: usize,
    pub initial_zone_temp_c: f64,
    pub initial_wall_temp_c: f64,
    #[validate(range(min = 0.0))]
    pub initial_co2_ppm: f64,
    #[validate(range(min = 1))]
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_setpoint_band"))]
pub struct ControlConfig {
    pub default_setpoint_c: f64,
    pub min_setpoint_c: f64,
    pub max_setpoint_c: f64,
}

impl ControlConfig {
    pub fn band(&self) -> SetpointBand {
        SetpointBand {
            min_c: self.min_setpoint_c,
            max_c: self.max_setpoint_c,
        }
    }
}

fn validate_setpoint_band(control: &ControlConfig) -> Result<(), ValidationError> {
    let band = control.band();
    if !(band.min_c < band.max_c) {
        return Err(ValidationError::new("setpoint_band_empty"));
    }
    if band.check(control.default_setpoint_c).is_err() {
        return Err(ValidationError::new("default_setpoint_outside_band"));
    }
    Ok(())
}

/// Built-in sensor source, used when no field transport is wired in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorsConfig {
    pub synthetic: bool,
    #[validate(range(min = 1))]
    pub publish_interval_secs: u64,
    pub outdoor_base_c: f64,
    #[validate(range(min = 0.0))]
    pub outdoor_jitter_c: f64,
    pub max_occupants: u32,
}

#[cfg(feature = "sim")]
impl SensorsConfig {
    pub fn source_config(&self) -> crate::sensors::SyntheticSensorConfig {
        crate::sensors::SyntheticSensorConfig {
            publish_interval_secs: self.publish_interval_secs,
            outdoor_base_c: self.outdoor_base_c,
            outdoor_jitter_c: self.outdoor_jitter_c,
            max_occupants: self.max_occupants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConsumerConfig {
    #[validate(range(min = 1))]
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                request_timeout_secs: 30,
                enable_cors: false,
            },
            simulation: SimulationConfig {
                dt_seconds: 300.0,
                history_capacity: DEFAULT_HISTORY_CAPACITY,
                initial_zone_temp_c: 18.0,
                initial_wall_temp_c: 19.0,
                initial_co2_ppm: 600.0,
                channel_capacity: 64,
            },
            parameters: ParameterSet::default(),
            control: ControlConfig {
                default_setpoint_c: 24.0,
                min_setpoint_c: 18.0,
                max_setpoint_c: 28.0,
            },
            sensors: SensorsConfig {
                synthetic: true,
                publish_interval_secs: 5,
                outdoor_base_c: 25.0,
                outdoor_jitter_c: 2.0,
                max_occupants: 15,
            },
            consumer: ConsumerConfig {
                poll_interval_secs: 2,
            },
        }
    }
}

impl Config {
    /// Layering: built-in defaults, then `config/default.toml`, then `TWIN__*` env vars.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Field ranges plus the physical parameter checks
    pub fn check(&self) -> Result<()> {
        self.validate().context("invalid configuration")?;
        self.parameters.validate().context("invalid zone parameters")?;
        Ok(())
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            dt_seconds: self.simulation.dt_seconds,
            history_capacity: self.simulation.history_capacity,
            initial_state: StateVector::new(
                self.simulation.initial_zone_temp_c,
                self.simulation.initial_wall_temp_c,
                self.simulation.initial_co2_ppm,
            ),
            channel_capacity: self.simulation.channel_capacity,
            default_setpoint_c: self.control.default_setpoint_c,
            setpoint_band: self.control.band(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.check().is_ok());
        let settings = cfg.runtime_settings();
        assert_eq!(settings, RuntimeSettings::default());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(cfg.server.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                CONFIG_FILE,
                r#"
                [simulation]
                dt_seconds = 60.0
                history_capacity = 10

                [parameters]
                cop_cool = 4.0
                "#,
            )?;
            jail.set_env("TWIN__SERVER__PORT", "9100");
            jail.set_env("TWIN__CONTROL__DEFAULT_SETPOINT_C", "22.5");

            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.simulation.dt_seconds, 60.0);
            assert_eq!(cfg.simulation.history_capacity, 10);
            assert_eq!(cfg.parameters.cop_cool, 4.0);
            assert_eq!(cfg.parameters.cop_heat, 3.0);
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.control.default_setpoint_c, 22.5);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let mut cfg = Config::default();
        cfg.simulation.dt_seconds = 0.0;
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut cfg = Config::default();
        cfg.parameters.c_zone_kj_per_k = -1.0;
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_rejects_empty_band() {
        let mut cfg = Config::default();
        cfg.control.min_setpoint_c = 26.0;
        cfg.control.max_setpoint_c = 20.0;
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_rejects_default_outside_band() {
        let mut cfg = Config::default();
        cfg.control.default_setpoint_c = 30.0;
        assert!(cfg.check().is_err());
    }
}
