use maud::html;

use super::{Page, PageContext, RenderError};

const OPERATOR_ID: (&str, &str) = ("operatorId", "Operator");
const LINE_NUMBER: (&str, &str) = ("lineNumber", "Line number");
const ROUTE_KEY: (&str, &str) = ("routeKey", "Route");
const TIMESTAMP: (&str, &str) = ("timestamp", "Time");

/// Pages that only make sense with a search context in the query string.
/// Without one they render the search form instead of failing.
pub(crate) struct SearchPage {
    title: &'static str,
    intro: &'static str,
    fields: &'static [(&'static str, &'static str)],
}

impl SearchPage {
    pub(crate) fn timeline() -> Self {
        SearchPage {
            title: "Timeline",
            intro: "Planned and actual stops of a single ride, side by side.",
            fields: &[OPERATOR_ID, LINE_NUMBER, ROUTE_KEY, TIMESTAMP],
        }
    }

    pub(crate) fn gaps() -> Self {
        SearchPage {
            title: "Gaps",
            intro: "Rides that were planned but never recorded on the road.",
            fields: &[OPERATOR_ID, LINE_NUMBER, ROUTE_KEY, TIMESTAMP],
        }
    }

    pub(crate) fn single_line_map() -> Self {
        SearchPage {
            title: "Single line map",
            intro: "Recorded positions of every vehicle serving one line.",
            fields: &[OPERATOR_ID, LINE_NUMBER, ROUTE_KEY, TIMESTAMP],
        }
    }
}

impl Page for SearchPage {
    fn title(&self) -> &str {
        self.title
    }

    fn render(&self, ctx: &PageContext<'_>) -> Result<String, RenderError> {
        let markup = html! {
            section class="search-page" {
                h1 { (self.title) }
                p { (self.intro) }
                form class="search-form" method="get" action=(ctx.path) {
                    @for (name, label) in self.fields {
                        label for=(name) { (label) }
                        input id=(name) name=(name) value=(ctx.query.get(name).unwrap_or_default());
                    }
                    button type="submit" { "Search" }
                }
                @if ctx.query.is_empty() {
                    p class="prompt" { "Pick an operator, a line and a time to load this view." }
                } @else {
                    table class="search-context" {
                        @for (key, value) in ctx.query.iter().filter(|(_, v)| !v.is_empty()) {
                            tr { th { (key) } td { (value) } }
                        }
                    }
                }
            }
        };
        Ok(markup.into_string())
    }
}
