use crate::include_res;

use super::{Page, PageContext, RenderError};

/// Pages whose body does not depend on the request.
pub(crate) struct StaticPage {
    title: &'static str,
    body: &'static str,
}

impl StaticPage {
    pub(crate) fn dashboard() -> Self {
        StaticPage {
            title: "Dashboard",
            body: include_res!(str, "/pages/dashboard.html"),
        }
    }

    pub(crate) fn gaps_patterns() -> Self {
        StaticPage {
            title: "Gaps patterns",
            body: include_res!(str, "/pages/gaps_patterns.html"),
        }
    }

    pub(crate) fn realtime_map() -> Self {
        StaticPage {
            title: "Realtime map",
            body: include_res!(str, "/pages/realtime_map.html"),
        }
    }

    pub(crate) fn data_research() -> Self {
        StaticPage {
            title: "Data research",
            body: include_res!(str, "/pages/data_research.html"),
        }
    }
}

impl Page for StaticPage {
    fn title(&self) -> &str {
        self.title
    }

    fn render(&self, _ctx: &PageContext<'_>) -> Result<String, RenderError> {
        Ok(self.body.to_owned())
    }
}
