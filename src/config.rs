use bon::Builder;
use serde::{Deserialize, Serialize};

fn default_base_href() -> String {
    "/".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollRestoration {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Builder, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Returned by `previous_url`/`next_url` when there is no such entry.
    #[builder(into, default = default_base_href())]
    #[serde(default = "default_base_href")]
    pub base_href: String,
    #[builder(default)]
    #[serde(default)]
    pub scroll_restoration: ScrollRestoration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        CoordinatorConfig::builder().build()
    }
}
