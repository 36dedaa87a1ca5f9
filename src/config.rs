use std::{env, path::PathBuf, str::FromStr};

use url::Url;

use crate::{menu_image::DetectionParams, restaurant::Restaurant, slack, Error, Result};

const DEFAULT_CHANNEL: &str = "#kosilo";

/// Settings of a single run, read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    slack_token: Option<String>,
    slack_channel: String,
    slack_api_url: Url,
    restaurants: Vec<Restaurant>,
    menu_image_url: Option<Url>,
    image_dump_dir: Option<PathBuf>,
    detection: DetectionParams,
    dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let restaurants = match get("RESTAURANTS") {
            Some(names) => names
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| {
                    Restaurant::from_name(name)
                        .ok_or_else(|| Error::config_error(format!("unknown restaurant {name:?}")))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Restaurant::ALL.to_vec(),
        };
        if restaurants.is_empty() {
            return Err(Error::config_error("RESTAURANTS does not name any restaurant"));
        }

        let defaults = DetectionParams::default();
        let detection = DetectionParams {
            blur_sigma: parse_or(&get, "BLUR_SIGMA", defaults.blur_sigma)?,
            edge_threshold: parse_or(&get, "EDGE_THRESHOLD", defaults.edge_threshold)?,
            dilate_radius: parse_or(&get, "DILATE_RADIUS", defaults.dilate_radius)?,
            min_area: parse_or(&get, "MIN_REGION_AREA", defaults.min_area)?,
            merge_gap: parse_or(&get, "MERGE_GAP", defaults.merge_gap)?,
        };

        Ok(Self {
            slack_token: get("SLACK_TOKEN"),
            slack_channel: get("SLACK_CHANNEL").unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            slack_api_url: parse_url(get("SLACK_API_URL").as_deref(), "SLACK_API_URL")?
                .unwrap_or_else(|| {
                    Url::parse(slack::DEFAULT_API_BASE).expect("slack api url should be valid")
                }),
            restaurants,
            menu_image_url: parse_url(get("MENU_IMAGE_URL").as_deref(), "MENU_IMAGE_URL")?,
            image_dump_dir: get("MENU_IMAGE_DUMP").map(PathBuf::from),
            detection,
            dry_run: get("DRY_RUN").is_some_and(|v| {
                matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }),
        })
    }

    pub fn slack_token(&self) -> Option<&str> {
        self.slack_token.as_deref()
    }

    pub fn slack_channel(&self) -> &str {
        &self.slack_channel
    }

    pub const fn slack_api_url(&self) -> &Url {
        &self.slack_api_url
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub const fn menu_image_url(&self) -> Option<&Url> {
        self.menu_image_url.as_ref()
    }

    pub fn image_dump_dir(&self) -> Option<&std::path::Path> {
        self.image_dump_dir.as_deref()
    }

    pub const fn detection(&self) -> &DetectionParams {
        &self.detection
    }

    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    get(key).map_or(Ok(default), |v| {
        v.trim()
            .parse()
            .map_err(|_| Error::config_error(format!("{key}={v:?} is not a valid number")))
    })
}

fn parse_url(value: Option<&str>, key: &str) -> Result<Option<Url>> {
    value
        .map(|v| {
            Url::parse(v.trim())
                .map_err(|e| Error::config_error(format!("{key}={v:?} is not a valid url: {e}")))
        })
        .transpose()
}
