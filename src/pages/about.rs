use crate::{include_res, res};

use super::{Page, PageContext, RenderError};

pub(crate) struct About {
    body: String,
}

impl About {
    pub(crate) fn new() -> Self {
        About {
            body: res::markdown(include_res!(str, "/pages/about.md")),
        }
    }
}

impl Page for About {
    fn title(&self) -> &str {
        "About"
    }

    fn render(&self, _ctx: &PageContext<'_>) -> Result<String, RenderError> {
        Ok(format!("<article class=\"about\">{}</article>", self.body))
    }
}
