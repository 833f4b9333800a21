use bon::Builder;
use serde::{Deserialize, Serialize};

fn default_can_activate() -> bool {
    true
}

/// A single entry of the memory router's route table.
///
/// `path` is written without a leading slash. A segment starting with `:`
/// matches any single segment and `**` matches the remainder of the url.
#[derive(Builder, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    #[builder(into)]
    pub path: String,
    #[builder(into, default)]
    #[serde(default)]
    pub title: String,
    #[builder(into)]
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[builder(default = true)]
    #[serde(default = "default_can_activate")]
    pub can_activate: bool,
}

impl Route {
    pub fn matches(&self, url: &str) -> bool {
        let mut pattern = segments(&self.path);
        let mut path = segments(strip_query(url));
        loop {
            match (pattern.next(), path.next()) {
                (Some("**"), _) => return true,
                (Some(expected), Some(actual)) => {
                    if !expected.starts_with(':') && expected != actual {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    /// Tour of Heroes route table.
    pub fn defaults() -> Vec<Route> {
        vec![
            Route::builder().path("").redirect_to("/dashboard").build(),
            Route::builder().path("dashboard").title("Dashboard").build(),
            Route::builder().path("heroes").title("My Heroes").build(),
            Route::builder().path("detail/:id").title("Hero Detail").build(),
        ]
    }
}

fn strip_query(url: &str) -> &str {
    url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Ensures the url starts with exactly one slash.
pub fn normalize(url: &str) -> String {
    format!("/{}", url.trim_start_matches('/'))
}
