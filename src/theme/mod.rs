//! Per-theme page pipeline.
//!
//! Ember rewrites the rendered page: linked-post titles, external links and
//! the apps grid. Slate only adds the gallery lightbox, which is interactive
//! and lives in [`crate::lightbox`], so its page pass leaves markup alone.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::dom::{ArenaDom, parse_html, to_html};
use crate::error::{Error, Result};
use crate::lightbox::{GalleryItem, Lightbox, LightboxView, SWIPE_THRESHOLD};
use crate::links::{DEFAULT_LINKED_CARD, rewrite_external_links, rewrite_linked_posts};
use crate::reflow::{DEFAULT_CONTAINER, ReflowConfig, reflow_apps};

/// Which theme's behavior to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "cli",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Theme {
    #[default]
    Ember,
    Slate,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Ember => "ember",
            Theme::Slate => "slate",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ember" => Ok(Theme::Ember),
            "slate" => Ok(Theme::Slate),
            _ => Err(Error::InvalidTheme(s.to_string())),
        }
    }
}

/// Theme selection and its parameters.
///
/// ```
/// use themekit::theme::{Theme, ThemeConfig};
///
/// let config = ThemeConfig::new(Theme::Ember).with_host("example.com");
/// assert_eq!(config.apps_container, ".gh-apps-content");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
pub struct ThemeConfig {
    pub theme: Theme,
    /// Host of the page being processed. Links not mentioning it are
    /// treated as external.
    pub host: String,
    pub apps_container: String,
    pub linked_card: String,
    /// Minimum horizontal travel, in pixels, for a lightbox swipe.
    pub swipe_threshold: f64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            host: String::new(),
            apps_container: DEFAULT_CONTAINER.to_string(),
            linked_card: DEFAULT_LINKED_CARD.to_string(),
            swipe_threshold: SWIPE_THRESHOLD,
        }
    }
}

impl ThemeConfig {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_apps_container(mut self, selector: impl Into<String>) -> Self {
        self.apps_container = selector.into();
        self
    }

    pub fn with_linked_card(mut self, selector: impl Into<String>) -> Self {
        self.linked_card = selector.into();
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    /// Parse a JSON config. Missing fields keep their defaults.
    #[cfg(feature = "cli")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file.
    #[cfg(feature = "cli")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build a lightbox over `items` using this config's swipe threshold.
    pub fn lightbox<V: LightboxView>(&self, items: Vec<GalleryItem>, view: V) -> Lightbox<V> {
        Lightbox::new(items, view).with_swipe_threshold(self.swipe_threshold)
    }

    pub fn reflow(&self) -> ReflowConfig {
        ReflowConfig {
            container: self.apps_container.clone(),
        }
    }
}

/// What a page pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    pub linked_posts: usize,
    pub external_links: usize,
    pub app_entries: usize,
}

impl PageReport {
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// Run the theme's page passes over a parsed document.
///
/// An empty host skips the external-link pass, since every link would
/// otherwise count as local.
pub fn process_document(dom: &mut ArenaDom, config: &ThemeConfig) -> Result<PageReport> {
    let mut report = PageReport::default();
    match config.theme {
        Theme::Ember => {
            report.linked_posts = rewrite_linked_posts(dom, &config.linked_card)?;
            if config.host.is_empty() {
                debug!("no host configured, external links left alone");
            } else {
                report.external_links = rewrite_external_links(dom, &config.host);
            }
            report.app_entries = reflow_apps(dom, &config.reflow())?;
        }
        Theme::Slate => {
            debug!("slate has no page passes");
        }
    }
    info!(
        theme = %config.theme,
        linked_posts = report.linked_posts,
        external_links = report.external_links,
        app_entries = report.app_entries,
        "page processed"
    );
    Ok(report)
}

/// Parse `html`, run the theme's passes and serialize the result.
pub fn process_page(html: &str, config: &ThemeConfig) -> Result<(String, PageReport)> {
    let mut dom = parse_html(html);
    let report = process_document(&mut dom, config)?;
    Ok((to_html(&dom), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightbox::ViewState;

    const EMBER_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>t</title></head><body>
<article class="post-card tag-hash-linked">
  <h2 class="post-card-title"><a id="title" href="/linked/">Linked</a></h2>
  <div class="post-card-body"><p><a href="https://source.test/">src</a></p></div>
</article>
<a id="ext" href="https://other.test/">other</a>
<div class="gh-apps-content">
  <h3>Foo</h3>
  <p><a href="https://foo.test">foo.test</a><br>Does foo</p>
</div>
</body></html>"#;

    #[test]
    fn test_theme_names() {
        assert_eq!("ember".parse::<Theme>().unwrap(), Theme::Ember);
        assert_eq!("Slate".parse::<Theme>().unwrap(), Theme::Slate);
        assert!(matches!(
            "casper".parse::<Theme>(),
            Err(Error::InvalidTheme(name)) if name == "casper"
        ));
        assert_eq!(Theme::Slate.to_string(), "slate");
    }

    #[test]
    fn test_ember_runs_all_passes() {
        let config = ThemeConfig::new(Theme::Ember).with_host("example.com");
        let (html, report) = process_page(EMBER_PAGE, &config).unwrap();

        assert_eq!(
            report,
            PageReport {
                linked_posts: 1,
                // The rewritten title link, the card body link, the bare
                // external link and the app link.
                external_links: 4,
                app_entries: 1,
            }
        );
        assert!(html.contains(r#"class="app-entry""#));
        assert!(html.contains(r#"<a id="title" href="https://source.test/""#));
    }

    #[test]
    fn test_slate_leaves_page_alone() {
        let config = ThemeConfig::new(Theme::Slate).with_host("example.com");
        let (html, report) = process_page(EMBER_PAGE, &config).unwrap();

        assert!(report.is_unchanged());
        assert!(!html.contains("_blank"));
        assert!(html.contains("<h3>Foo</h3>"));
    }

    #[test]
    fn test_empty_host_skips_link_pass() {
        let config = ThemeConfig::new(Theme::Ember);
        let (_, report) = process_page(EMBER_PAGE, &config).unwrap();

        assert_eq!(report.external_links, 0);
        assert_eq!(report.app_entries, 1);
    }

    #[test]
    fn test_bad_selector_is_an_error() {
        let config = ThemeConfig::new(Theme::Ember).with_apps_container("[[");
        assert!(matches!(
            process_page(EMBER_PAGE, &config),
            Err(Error::Selector(_))
        ));
    }

    #[test]
    fn test_lightbox_uses_swipe_threshold() {
        let items = vec![GalleryItem::new("/a.jpg", "A"), GalleryItem::new("/b.jpg", "B")];
        let config = ThemeConfig::new(Theme::Slate).with_swipe_threshold(80.0);
        let mut lightbox = config.lightbox(items, ViewState::default());
        assert_eq!(lightbox.swipe_threshold(), 80.0);

        lightbox.open(0);
        lightbox.touch_start(200.0);
        assert!(lightbox.touch_end(140.0).is_none(), "60px is under the threshold");
        lightbox.touch_start(200.0);
        assert!(lightbox.touch_end(110.0).is_some());

        let view = lightbox.into_view();
        assert_eq!(view.image_src, "/b.jpg");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_json_config_defaults() {
        let config = ThemeConfig::from_json(r#"{"theme": "slate", "swipe_threshold": 80}"#).unwrap();

        assert_eq!(config.theme, Theme::Slate);
        assert_eq!(config.swipe_threshold, 80.0);
        let lightbox = config.lightbox(Vec::new(), ViewState::default());
        assert_eq!(lightbox.swipe_threshold(), 80.0);
        assert_eq!(config.linked_card, ".post-card.tag-hash-linked");
        assert!(ThemeConfig::from_json(r#"{"theme": "casper"}"#).is_err());
    }
}
