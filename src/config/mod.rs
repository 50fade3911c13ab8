use anyhow::{anyhow, Result};
use mylocations_core::{current_location::Settings, entities::Distance};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "mylocations.toml";

const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";

#[derive(Debug)]
pub struct Config {
    pub acquisition: Settings,
    pub geocoding: Geocoding,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => {
                log::info!("Load configuration from {}", file_path.display());
                toml::from_str(&cfg_string)?
            }
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let api_key = env::var(ENV_NAME_OPENCAGE_API_KEY).ok();
        Self::try_from_raw(raw_config, api_key)
    }

    fn try_from_raw(mut raw_config: raw::Config, opencage_api_key: Option<String>) -> Result<Self> {
        if let Some(api_key) = opencage_api_key.filter(|key| !key.trim().is_empty()) {
            log::debug!("Use OpenCage API key from {ENV_NAME_OPENCAGE_API_KEY}");
            raw_config
                .gateway
                .get_or_insert_with(Default::default)
                .opencage
                .get_or_insert_with(Default::default)
                .api_key = Some(api_key);
        }
        Self::try_from(raw_config)
    }
}

#[derive(Debug, Default)]
pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodingGateway {
    OpenCage { api_key: String },
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            acquisition,
            geocoding,
            gateway,
        } = from;

        let acquisition = acquisition_settings(acquisition.unwrap_or_default())?;

        let geo_gateway = match geocoding.and_then(|g| g.gateway) {
            Some(gw_name) => {
                let toml_name = gw_name.name();
                let gateway = gateway.unwrap_or_default();
                let gw = match gw_name {
                    raw::GeocodingGateway::Opencage => {
                        let api_key = gateway
                            .opencage
                            .and_then(|oc| oc.api_key)
                            .ok_or_else(|| anyhow!("Missing '{toml_name}' gateway configuration"))?;
                        log::info!("Use OpenCage geocoding gateway");
                        GeocodingGateway::OpenCage { api_key }
                    }
                };
                Some(gw)
            }
            None => {
                let api_key = gateway.and_then(|gw| gw.opencage).and_then(|oc| oc.api_key);
                if let Some(api_key) = api_key {
                    log::info!("Use OpenCage geocoding gateway");
                    Some(GeocodingGateway::OpenCage { api_key })
                } else {
                    log::warn!("No geocoding gateway was configured");
                    None
                }
            }
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
        };

        Ok(Self {
            acquisition,
            geocoding,
        })
    }
}

fn acquisition_settings(from: raw::Acquisition) -> Result<Settings> {
    let raw::Acquisition {
        desired_accuracy,
        timeout,
        max_fix_age,
        stable_distance,
        stable_interval,
    } = from;
    let defaults = Settings::default();

    let desired_accuracy = desired_accuracy
        .map(Distance::from_meters)
        .unwrap_or(defaults.desired_accuracy);
    if !(desired_accuracy.is_valid() && desired_accuracy.to_meters() > 0.0) {
        return Err(anyhow!(
            "Invalid desired accuracy: {desired_accuracy} (must be greater than 0)"
        ));
    }
    let stable_distance = stable_distance
        .map(Distance::from_meters)
        .unwrap_or(defaults.stable_distance);
    if !stable_distance.is_valid() {
        return Err(anyhow!("Invalid stable distance: {stable_distance}"));
    }
    let timeout = timeout.unwrap_or(defaults.timeout);
    if timeout == Duration::ZERO {
        return Err(anyhow!("The acquisition timeout must not be zero"));
    }

    Ok(Settings {
        desired_accuracy,
        timeout,
        max_fix_age: max_fix_age.unwrap_or(defaults.max_fix_age),
        stable_distance,
        stable_interval: stable_interval.unwrap_or(defaults.stable_interval),
    })
}
