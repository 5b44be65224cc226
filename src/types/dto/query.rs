use serde::Deserialize;

use crate::errors::internal::ValidationError;
use crate::types::internal::PageParams;

/// Raw query string of the list endpoints; each endpoint reads the keys it knows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,

    /// Comma-separated exact hostnames
    pub hostnames: Option<String>,

    pub resolved: Option<String>,
    pub my_teams: Option<String>,
    pub hash: Option<String>,

    #[serde(rename = "provider_type")]
    pub provider_type: Option<String>,
}

impl ListQuery {
    pub fn page_params(&self) -> Result<PageParams, ValidationError> {
        PageParams::parse(self.page.as_deref(), self.page_size.as_deref())
    }

    pub fn hostnames(&self) -> Vec<String> {
        self.hostnames
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn resolved(&self) -> Result<Option<bool>, ValidationError> {
        parse_flag("resolved", self.resolved.as_deref())
    }

    pub fn my_teams(&self) -> Result<bool, ValidationError> {
        Ok(parse_flag("myTeams", self.my_teams.as_deref())?.unwrap_or(false))
    }

    pub fn hash(&self) -> Option<String> {
        self.hash.as_deref().filter(|hash| !hash.is_empty()).map(str::to_string)
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(Some(true)),
        "false" | "f" | "0" => Ok(Some(false)),
        _ => Err(ValidationError::new(
            name,
            format!("{} query parameter must be a boolean", name),
        )),
    }
}
