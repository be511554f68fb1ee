use std::{collections::HashSet, sync::LazyLock};

use serde::Serialize;
use thiserror::Error;

use crate::{lazy::Renderable, pages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Laptop,
    FieldTime,
    BarChart,
    LineChart,
    HeatMap,
    RadarChart,
    InfoCircle,
    Bug,
    Dollar,
}

impl Icon {
    pub fn name(&self) -> &'static str {
        use Icon::*;
        match self {
            Laptop => "laptop",
            FieldTime => "field-time",
            BarChart => "bar-chart",
            LineChart => "line-chart",
            HeatMap => "heat-map",
            RadarChart => "radar-chart",
            InfoCircle => "info-circle",
            Bug => "bug",
            Dollar => "dollar",
        }
    }
}

/// One navigable destination.
#[derive(Debug, Clone, Copy)]
pub struct PageDescriptor {
    /// Translation key, never shown verbatim by this crate.
    pub label: &'static str,
    pub path: &'static str,
    pub requires_query_params: bool,
    pub icon: Icon,
    /// `None` marks a link-only entry.
    pub renderable: Option<&'static Renderable>,
}

impl PageDescriptor {
    pub fn is_external(&self) -> bool {
        is_external(self.path)
    }

    pub fn is_routable(&self) -> bool {
        self.renderable.is_some() && !self.is_external()
    }

    /// Link target: the external URL as is, or the internal path anchored at `/`.
    pub fn href(&self) -> String {
        if self.is_external() {
            self.path.to_owned()
        } else {
            anchor(self.path)
        }
    }
}

pub(crate) fn is_external(path: &str) -> bool {
    path.starts_with("https://") || path.starts_with("http://")
}

pub(crate) fn anchor(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: &'static str,
    pub href: String,
    pub icon: Icon,
    pub external: bool,
    pub requires_query_params: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate routable path {0}")]
    DuplicatePath(String),
    #[error("registry has no routable page to use as the default target")]
    NoDefaultTarget,
}

#[derive(Debug)]
pub struct Registry {
    entries: Vec<PageDescriptor>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| Registry {
    entries: builtin_entries(),
});

pub(crate) const DONATION_URL: &str =
    "https://www.jgive.com/new/he/ils/donation-targets/3268#donation-modal";

fn builtin_entries() -> Vec<PageDescriptor> {
    vec![
        PageDescriptor {
            label: "dashboard_page_title",
            path: "/dashboard",
            requires_query_params: false,
            icon: Icon::Laptop,
            renderable: Some(&pages::DASHBOARD),
        },
        PageDescriptor {
            label: "timeline_page_title",
            path: "/timeline",
            requires_query_params: true,
            icon: Icon::FieldTime,
            renderable: Some(&pages::TIMELINE),
        },
        PageDescriptor {
            label: "gaps_page_title",
            path: "/gaps",
            requires_query_params: true,
            icon: Icon::BarChart,
            renderable: Some(&pages::GAPS),
        },
        PageDescriptor {
            label: "gaps_patterns_page_title",
            path: "/gaps_patterns",
            requires_query_params: false,
            icon: Icon::LineChart,
            renderable: Some(&pages::GAPS_PATTERNS),
        },
        PageDescriptor {
            label: "realtime_map_page_title",
            path: "/map",
            requires_query_params: false,
            icon: Icon::HeatMap,
            renderable: Some(&pages::REALTIME_MAP),
        },
        PageDescriptor {
            label: "singleline_map_page_title",
            path: "/single-line-map",
            requires_query_params: true,
            icon: Icon::RadarChart,
            renderable: Some(&pages::SINGLE_LINE_MAP),
        },
        PageDescriptor {
            label: "about_title",
            path: "/about",
            requires_query_params: false,
            icon: Icon::InfoCircle,
            renderable: Some(&pages::ABOUT),
        },
        PageDescriptor {
            label: "report_a_bug_title",
            path: "report-a-bug",
            requires_query_params: false,
            icon: Icon::Bug,
            renderable: Some(&pages::BUG_REPORT),
        },
        PageDescriptor {
            label: "donate_title",
            path: DONATION_URL,
            requires_query_params: false,
            icon: Icon::Dollar,
            renderable: None,
        },
    ]
}

impl Registry {
    pub fn new(entries: Vec<PageDescriptor>) -> Result<Registry, RegistryError> {
        let mut seen = HashSet::new();
        for entry in entries.iter().filter(|e| e.is_routable()) {
            if !seen.insert(entry.href().to_ascii_lowercase()) {
                return Err(RegistryError::DuplicatePath(entry.href()));
            }
        }
        if seen.is_empty() {
            return Err(RegistryError::NoDefaultTarget);
        }

        Ok(Registry { entries })
    }

    /// The dashboard's page list, built on first use.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.entries
    }

    pub fn routable(&self) -> impl Iterator<Item = &PageDescriptor> {
        self.entries.iter().filter(|e| e.is_routable())
    }

    pub fn default_target(&self) -> &PageDescriptor {
        // `new` refuses registries without a routable entry
        self.routable()
            .next()
            .unwrap_or(&self.entries[0])
    }

    /// Menu in registry order. Pages that need search context keep the
    /// current query string so switching views does not drop it.
    pub fn menu(&self, query: Option<&str>) -> Vec<MenuItem> {
        let query = query.filter(|q| !q.is_empty());
        self.entries
            .iter()
            .map(|entry| {
                let mut href = entry.href();
                if let (true, false, Some(query)) =
                    (entry.requires_query_params, entry.is_external(), query)
                {
                    href = format!("{href}?{query}");
                }
                MenuItem {
                    label: entry.label,
                    href,
                    icon: entry.icon,
                    external: entry.is_external(),
                    requires_query_params: entry.requires_query_params,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageKind;

    #[test]
    fn builtin_entries_are_valid() {
        let registry = Registry::new(builtin_entries()).unwrap();
        assert_eq!(registry.pages().len(), 9);
        assert_eq!(registry.routable().count(), 8);
    }

    #[test]
    fn default_target_is_first_routable_entry() {
        let registry = Registry::builtin();
        assert_eq!(registry.default_target().path, "/dashboard");
        assert_eq!(
            registry.default_target().renderable.unwrap().kind(),
            PageKind::Dashboard
        );
    }

    #[test]
    fn default_target_follows_registry_order() {
        let entries = vec![
            PageDescriptor {
                label: "a",
                path: "https://example.org/",
                requires_query_params: false,
                icon: Icon::Dollar,
                renderable: Some(&pages::ABOUT),
            },
            PageDescriptor {
                label: "b",
                path: "/b",
                requires_query_params: false,
                icon: Icon::Laptop,
                renderable: Some(&pages::GAPS),
            },
            PageDescriptor {
                label: "c",
                path: "/c",
                requires_query_params: false,
                icon: Icon::Laptop,
                renderable: Some(&pages::DASHBOARD),
            },
        ];
        let registry = Registry::new(entries).unwrap();
        assert_eq!(registry.default_target().path, "/b");
    }

    #[test]
    fn duplicate_routable_paths_are_rejected() {
        let entry = PageDescriptor {
            label: "x",
            path: "/x",
            requires_query_params: false,
            icon: Icon::Laptop,
            renderable: Some(&pages::DASHBOARD),
        };
        let relative = PageDescriptor { path: "x", ..entry };
        assert_eq!(
            Registry::new(vec![entry, relative]).unwrap_err(),
            RegistryError::DuplicatePath("/x".to_owned())
        );
    }

    #[test]
    fn link_only_entries_may_share_paths() {
        let link = PageDescriptor {
            label: "x",
            path: "/x",
            requires_query_params: false,
            icon: Icon::Laptop,
            renderable: None,
        };
        let page = PageDescriptor {
            renderable: Some(&pages::DASHBOARD),
            ..link
        };
        assert!(Registry::new(vec![link, link, page]).is_ok());
    }

    #[test]
    fn registry_without_routable_entry_is_rejected() {
        let link = PageDescriptor {
            label: "donate_title",
            path: DONATION_URL,
            requires_query_params: false,
            icon: Icon::Dollar,
            renderable: None,
        };
        assert_eq!(
            Registry::new(vec![link]).unwrap_err(),
            RegistryError::NoDefaultTarget
        );
    }

    #[test]
    fn menu_keeps_order_and_link_only_entries() {
        let menu = Registry::builtin().menu(None);
        let hrefs: Vec<_> = menu.iter().map(|m| m.href.as_str()).collect();
        assert_eq!(
            hrefs,
            [
                "/dashboard",
                "/timeline",
                "/gaps",
                "/gaps_patterns",
                "/map",
                "/single-line-map",
                "/about",
                "/report-a-bug",
                DONATION_URL,
            ]
        );
        assert!(menu.last().unwrap().external);
        assert!(menu.iter().rev().skip(1).all(|m| !m.external));
    }

    #[test]
    fn menu_carries_query_to_pages_that_need_it() {
        let menu = Registry::builtin().menu(Some("operatorId=3&lineNumber=5"));
        let timeline = menu.iter().find(|m| m.label == "timeline_page_title").unwrap();
        assert_eq!(timeline.href, "/timeline?operatorId=3&lineNumber=5");
        let dashboard = menu.iter().find(|m| m.label == "dashboard_page_title").unwrap();
        assert_eq!(dashboard.href, "/dashboard");
    }

    #[test]
    fn menu_serializes_camel_case() {
        let menu = Registry::builtin().menu(None);
        let json = serde_json::to_value(&menu[1]).unwrap();
        assert_eq!(json["requiresQueryParams"], true);
        assert_eq!(json["icon"], "field-time");
    }
}
