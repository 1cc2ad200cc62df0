use serde::{Deserialize, Serialize};

/// One catalog entry as found in `videodata.json`.
///
/// `id` is never read from the input: it is derived from `url` when the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoRecord {
    #[serde(skip_deserializing)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Player URL embedded into the generated page.
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub views: Option<u64>,
}

impl VideoRecord {
    /// Last path segment of the page url, e.g. `videos/diego-yoga.html`.
    pub fn file_name(&self) -> Option<&str> {
        file_name(&self.url)
    }

    pub fn matches(&self, lower_query: &str) -> bool {
        self.title.to_lowercase().contains(lower_query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(lower_query))
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(lower_query))
    }
}

fn file_name(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}

/// `videos/diego-yoga.html` -> `diego-yoga`.
pub fn derive_id(url: &str) -> Option<&str> {
    let name = file_name(url)?;
    let stem = name.strip_suffix(".html").unwrap_or(name);

    (!stem.is_empty()).then_some(stem)
}
