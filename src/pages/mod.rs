mod about;
mod bug_report;
mod overview;
mod profile;
mod release;
mod search;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{lazy::Renderable, resolver::RouteParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Dashboard,
    Timeline,
    Gaps,
    GapsPatterns,
    RealtimeMap,
    SingleLineMap,
    About,
    BugReport,
    Profile,
    DataResearch,
    Release,
}

/// A materialized page unit. Implementations return the page body; the
/// shell adds the frame and menu around it.
pub trait Page: Send + Sync {
    fn title(&self) -> &str;
    fn render(&self, ctx: &PageContext<'_>) -> Result<String, RenderError>;
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no route record was loaded for this page")]
    MissingRecord,
    #[error("route parameter {0} is missing")]
    MissingParam(&'static str),
    #[error("failed to format route record: {0}")]
    Format(#[from] serde_json::Error),
}

/// Decoded query string, in the order it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    /// Decoding is lenient like a browser's: bad escapes are replaced,
    /// never rejected.
    pub fn parse(query: Option<&str>) -> SearchParams {
        let pairs = query.map(serde_urlencoded::from_str::<Vec<(String, String)>>);
        match pairs {
            Some(Ok(pairs)) => SearchParams(pairs),
            Some(Err(_)) | None => SearchParams::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, v)| v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub struct PageContext<'a> {
    pub path: &'a str,
    pub params: &'a RouteParams,
    pub query: &'a SearchParams,
    /// Loader output, only present for routes that fetch before rendering.
    pub record: Option<&'a Value>,
}

fn dashboard() -> Box<dyn Page> {
    Box::new(overview::StaticPage::dashboard())
}

fn timeline() -> Box<dyn Page> {
    Box::new(search::SearchPage::timeline())
}

fn gaps() -> Box<dyn Page> {
    Box::new(search::SearchPage::gaps())
}

fn gaps_patterns() -> Box<dyn Page> {
    Box::new(overview::StaticPage::gaps_patterns())
}

fn realtime_map() -> Box<dyn Page> {
    Box::new(overview::StaticPage::realtime_map())
}

fn single_line_map() -> Box<dyn Page> {
    Box::new(search::SearchPage::single_line_map())
}

fn about() -> Box<dyn Page> {
    Box::new(about::About::new())
}

fn bug_report() -> Box<dyn Page> {
    Box::new(bug_report::BugReport)
}

fn profile() -> Box<dyn Page> {
    Box::new(profile::Profile)
}

fn data_research() -> Box<dyn Page> {
    Box::new(overview::StaticPage::data_research())
}

fn release() -> Box<dyn Page> {
    Box::new(release::Release)
}

pub static DASHBOARD: Renderable = Renderable::new(PageKind::Dashboard, dashboard);
pub static TIMELINE: Renderable = Renderable::new(PageKind::Timeline, timeline);
pub static GAPS: Renderable = Renderable::new(PageKind::Gaps, gaps);
pub static GAPS_PATTERNS: Renderable = Renderable::new(PageKind::GapsPatterns, gaps_patterns);
pub static REALTIME_MAP: Renderable = Renderable::new(PageKind::RealtimeMap, realtime_map);
pub static SINGLE_LINE_MAP: Renderable = Renderable::new(PageKind::SingleLineMap, single_line_map);
pub static ABOUT: Renderable = Renderable::new(PageKind::About, about);
pub static BUG_REPORT: Renderable = Renderable::new(PageKind::BugReport, bug_report);
pub static PROFILE: Renderable = Renderable::new(PageKind::Profile, profile);
pub static DATA_RESEARCH: Renderable = Renderable::new(PageKind::DataResearch, data_research);
pub static RELEASE: Renderable = Renderable::new(PageKind::Release, release);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_keep_order_and_decode() {
        let query = SearchParams::parse(Some("lineNumber=5&operatorId=3&timestamp=2024-01-01T10%3A00"));
        let pairs: Vec<_> = query.iter().collect();
        assert_eq!(
            pairs,
            [
                ("lineNumber", "5"),
                ("operatorId", "3"),
                ("timestamp", "2024-01-01T10:00")
            ]
        );
        assert_eq!(query.get("operatorId"), Some("3"));
        assert_eq!(query.get("routeKey"), None);
    }

    #[test]
    fn blank_values_count_as_empty() {
        assert!(SearchParams::parse(None).is_empty());
        assert!(SearchParams::parse(Some("")).is_empty());
        assert!(SearchParams::parse(Some("lineNumber=")).is_empty());
        assert!(!SearchParams::parse(Some("lineNumber=1")).is_empty());
    }

    #[test]
    fn bad_escapes_are_decoded_leniently() {
        let query = SearchParams::parse(Some("lineNumber=%FF&operatorId=%"));
        assert_eq!(query.get("lineNumber"), Some("\u{FFFD}"));
        assert_eq!(query.get("operatorId"), Some("%"));
    }
}
