use std::{borrow::Cow, path::Path};

use color_eyre::eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::catalog::VideoRecord;

/// Sample texts of the stock template and `{{ name }}` placeholders. Replaced in a single
/// pass, so filled-in values are never matched again.
static REGEX_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<legacy>Video Title - Video Site|VIDEO_EMBED_URL_HERE|Video Title Here",
        r"|2026-01-23|Video description goes here\.\.\.)",
        r"|\{\{\s*(?P<name>[a-z_]+)\s*\}\}",
    ))
    .unwrap()
});

const NO_DESCRIPTION: &str = "No description available";

/// Values filled into one page.
#[derive(Debug)]
pub struct PageContext<'a> {
    pub record: &'a VideoRecord,
    pub site_name: &'a str,
    /// Pre-rendered sidebar HTML, inserted as is.
    pub related_html: &'a str,
}

/// The page every video is rendered from.
///
/// Understands the sample texts of the stock `video-template.html` as well as
/// `{{ name }}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("could not read template '{}'", path.display()))?;

        Ok(Self::new(source))
    }

    pub fn render(&self, page: &PageContext<'_>) -> String {
        let record = page.record;
        let title = htmlize::escape_text(record.title.as_str());
        let site_name = htmlize::escape_text(page.site_name);
        let embed = htmlize::escape_attribute(record.embed.as_deref().unwrap_or_default());
        let date = htmlize::escape_text(record.date.as_deref().unwrap_or_default());
        let description =
            htmlize::escape_text(record.description.as_deref().unwrap_or(NO_DESCRIPTION));

        REGEX_MARKER
            .replace_all(&self.source, |captures: &Captures| {
                if let Some(legacy) = captures.name("legacy") {
                    return match legacy.as_str() {
                        "Video Title - Video Site" => format!("{title} - {site_name}"),
                        "VIDEO_EMBED_URL_HERE" => embed.to_string(),
                        "Video Title Here" => title.to_string(),
                        "2026-01-23" => date.to_string(),
                        _ => description.to_string(),
                    };
                }

                let name = &captures["name"];
                let value: Cow<str> = match name {
                    "title" => title.clone(),
                    "site_name" => site_name.clone(),
                    "embed" => embed.clone(),
                    "date" => date.clone(),
                    "description" => description.clone(),
                    "id" => htmlize::escape_text(record.id.as_str()),
                    "url" => htmlize::escape_attribute(record.url.as_str()),
                    "related" => Cow::Borrowed(page.related_html),
                    _ => {
                        warn!("Unknown template placeholder '{name}' left as is");
                        return captures[0].to_owned();
                    }
                };

                value.into_owned()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VideoRecord {
        VideoRecord {
            id: "diego-yoga".into(),
            title: "Diego <3 Yoga".into(),
            url: "videos/diego-yoga.html".into(),
            images: vec![],
            thumbnail: String::new(),
            tags: vec![],
            description: None,
            date: Some("2026-02-01".into()),
            embed: Some("https://player.example.com/embed?v=1&autoplay=0".into()),
            views: None,
        }
    }

    fn render(source: &str) -> String {
        let record = record();
        Template::new(source).render(&PageContext {
            record: &record,
            site_name: "Yoga Hub",
            related_html: "<li>related</li>",
        })
    }

    #[test]
    fn test_legacy_markers_are_replaced() {
        let html = render(concat!(
            "<title>Video Title - Video Site</title>",
            "<iframe src=\"VIDEO_EMBED_URL_HERE\"></iframe>",
            "<h1>Video Title Here</h1>",
            "<time>2026-01-23</time>",
            "<p>Video description goes here...</p>",
        ));

        assert_eq!(
            html,
            concat!(
                "<title>Diego &lt;3 Yoga - Yoga Hub</title>",
                "<iframe src=\"https://player.example.com/embed?v=1&amp;autoplay=0\"></iframe>",
                "<h1>Diego &lt;3 Yoga</h1>",
                "<time>2026-02-01</time>",
                "<p>No description available</p>",
            )
        );
    }

    #[test]
    fn test_placeholders_are_replaced() {
        let html = render("<a href=\"{{url}}\">{{ title }}</a><ul>{{ related }}</ul>{{id}}");

        assert_eq!(
            html,
            "<a href=\"videos/diego-yoga.html\">Diego &lt;3 Yoga</a><ul><li>related</li></ul>diego-yoga"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_left_untouched() {
        assert_eq!(render("<p>{{ rating }}</p>"), "<p>{{ rating }}</p>");
    }

    #[test]
    fn test_missing_optional_values_render_empty() {
        let mut record = record();
        record.embed = None;
        record.date = None;

        let html = Template::new("[{{ embed }}][{{ date }}]").render(&PageContext {
            record: &record,
            site_name: "Yoga Hub",
            related_html: "",
        });

        assert_eq!(html, "[][]");
    }

    #[test]
    fn test_values_are_not_substituted_again() {
        let mut record = record();
        record.title = "Recap of 2026-01-23".into();
        record.description = Some("Type {{ related }} and {{ url }} here".into());

        let html = Template::new(
            "<title>Video Title - Video Site</title><time>2026-01-23</time><p>{{ description }}</p>",
        )
        .render(&PageContext {
            record: &record,
            site_name: "S",
            related_html: "<script>x</script>",
        });

        assert_eq!(
            html,
            concat!(
                "<title>Recap of 2026-01-23 - S</title>",
                "<time>2026-02-01</time>",
                "<p>Type {{ related }} and {{ url }} here</p>",
            )
        );
    }

    #[test]
    fn test_legacy_description_marker_keeps_user_markup_escaped() {
        let mut record = record();
        record.description = Some("<b>Video Title Here</b> {{ related }}".into());

        let html = Template::new("<p>Video description goes here...</p>").render(&PageContext {
            record: &record,
            site_name: "S",
            related_html: "<script>x</script>",
        });

        assert_eq!(html, "<p>&lt;b&gt;Video Title Here&lt;/b&gt; {{ related }}</p>");
    }
}
