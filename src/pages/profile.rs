use serde_json::Value;

use maud::html;

use super::{Page, PageContext, RenderError};

const FIELDS: [(&str, &str); 8] = [
    ("id", "Route id"),
    ("route_short_name", "Line"),
    ("route_long_name", "Description"),
    ("agency_name", "Operator"),
    ("operator_ref", "Operator ref"),
    ("line_ref", "Line ref"),
    ("route_mkt", "Catalog number"),
    ("date", "Date"),
];

trait GetField {
    fn get_display_field(&self, field: &str) -> Option<String>;
}

impl GetField for Value {
    fn get_display_field(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Line profile, rendered from the GTFS route record loaded for it.
pub(crate) struct Profile;

impl Page for Profile {
    fn title(&self) -> &str {
        "Line profile"
    }

    fn render(&self, ctx: &PageContext<'_>) -> Result<String, RenderError> {
        let route_id = ctx
            .params
            .get("routeId")
            .ok_or(RenderError::MissingParam("routeId"))?;
        let record = ctx.record.ok_or(RenderError::MissingRecord)?;

        let heading = record
            .get_display_field("route_short_name")
            .unwrap_or_else(|| route_id.to_owned());
        let json = serde_json::to_string_pretty(record)?;

        let markup = html! {
            section class="profile" {
                h1 { "Line " (heading) }
                table class="route-record" {
                    @for (field, label) in FIELDS {
                        @if let Some(value) = record.get_display_field(field) {
                            tr { th { (label) } td { (value) } }
                        }
                    }
                }
                details {
                    summary { "Full record" }
                    pre class="route-record-json" { (json) }
                }
            }
        };
        Ok(markup.into_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{pages::SearchParams, resolver::RouteParams};

    fn render(record: Option<&Value>) -> Result<String, RenderError> {
        let params = RouteParams::from(vec![("routeId", "12345".to_owned())]);
        let query = SearchParams::default();
        let ctx = PageContext {
            path: "/profile/12345",
            params: &params,
            query: &query,
            record,
        };
        Profile.render(&ctx)
    }

    #[test]
    fn renders_known_fields_and_full_record() {
        let record = json!({ "id": 12345, "route_short_name": "5", "route_long_name": "<Tel Aviv>" });
        let html = render(Some(&record)).unwrap();
        assert!(html.contains("<tr><th>Line</th><td>5</td></tr>"));
        assert!(html.contains("<tr><th>Route id</th><td>12345</td></tr>"));
        assert!(html.contains("<td>&lt;Tel Aviv&gt;</td>"));
        assert!(!html.contains("<Tel Aviv>"));
        assert!(html.contains("route_short_name"));
    }

    #[test]
    fn non_object_records_are_shown_as_json() {
        let record = json!([1, 2]);
        let html = render(Some(&record)).unwrap();
        assert!(!html.contains("<tr>"));
        assert!(html.contains("12345"));
    }

    #[test]
    fn fails_without_record() {
        assert!(matches!(render(None), Err(RenderError::MissingRecord)));
    }
}
