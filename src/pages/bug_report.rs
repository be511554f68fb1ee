use maud::html;

use super::{Page, PageContext, RenderError};

const FIELDS: [(&str, &str, &str); 5] = [
    ("title", "Title", "text"),
    ("description", "What happened?", "textarea"),
    ("environment", "Browser and device", "text"),
    ("expectedBehavior", "What did you expect?", "textarea"),
    ("contactName", "Your name", "text"),
];

/// The bug report form. Submitting it is handled by the issue tracker,
/// not by this server.
pub(crate) struct BugReport;

impl Page for BugReport {
    fn title(&self) -> &str {
        "Report a bug"
    }

    fn render(&self, _ctx: &PageContext<'_>) -> Result<String, RenderError> {
        let markup = html! {
            section class="bug-report" {
                h1 { "Report a bug" }
                p { "Tell us what went wrong. Please include the page address and the time it happened." }
                form class="bug-report-form" {
                    @for (name, label, kind) in FIELDS {
                        label for=(name) { (label) }
                        @if kind == "textarea" {
                            textarea id=(name) name=(name) rows="4" {}
                        } @else {
                            input id=(name) name=(name) type=(kind);
                        }
                    }
                    button type="submit" disabled { "Send" }
                }
            }
        };
        Ok(markup.into_string())
    }
}
