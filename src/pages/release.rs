use crate::include_res;

use super::{Page, PageContext, RenderError};

/// The release notes are hosted elsewhere and only embedded here.
pub(crate) const RELEASE_NOTES_URL: &str = "https://noam-gaash.co.il/databus/";

pub(crate) struct Release;

impl Page for Release {
    fn title(&self) -> &str {
        "Release"
    }

    fn render(&self, _ctx: &PageContext<'_>) -> Result<String, RenderError> {
        Ok(include_res!(str, "/pages/release.html").replace("{src}", RELEASE_NOTES_URL))
    }
}
