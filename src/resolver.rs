use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    lazy::Renderable,
    pages::{self, PageKind},
    registry::{Registry, anchor},
};

pub const PROFILE_PREFIX: &str = "/profile";
pub const PROFILE_PARAM: &str = "routeId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Exact(String),
    /// `{prefix}/{name}` with exactly one non-empty trailing segment.
    Param { prefix: String, name: &'static str },
    Wildcard,
}

impl Matcher {
    pub fn exact(path: &str) -> Matcher {
        Matcher::Exact(normalize(path))
    }

    pub fn pattern(&self) -> String {
        match self {
            Matcher::Exact(path) => path.clone(),
            Matcher::Param { prefix, name } => format!("{prefix}/:{name}"),
            Matcher::Wildcard => "*".to_owned(),
        }
    }

    fn matches(&self, path: &str) -> Option<RouteParams> {
        match self {
            Matcher::Exact(expected) => expected
                .eq_ignore_ascii_case(path)
                .then(RouteParams::default),
            Matcher::Param { prefix, name } => {
                let head = path.get(..prefix.len())?;
                if !head.eq_ignore_ascii_case(prefix) {
                    return None;
                }
                let value = path[prefix.len()..].strip_prefix('/')?;
                if value.is_empty() || value.contains('/') {
                    return None;
                }
                Some(RouteParams(vec![(*name, value.to_owned())]))
            }
            Matcher::Wildcard => Some(RouteParams::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Loader {
    /// `GET /gtfs_routes/get?id={routeId}` against the Stride API.
    GtfsRoute,
}

#[derive(Debug, Clone)]
pub enum Handler {
    Render(&'static Renderable),
    Load {
        renderable: &'static Renderable,
        loader: Loader,
    },
    Redirect(String),
}

impl Handler {
    pub fn renderable(&self) -> Option<&'static Renderable> {
        match self {
            Handler::Render(renderable) | Handler::Load { renderable, .. } => Some(*renderable),
            Handler::Redirect(_) => None,
        }
    }

    pub fn loader(&self) -> Option<Loader> {
        match self {
            Handler::Load { loader, .. } => Some(*loader),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub matcher: Matcher,
    pub handler: Handler,
}

impl RouteEntry {
    pub fn render(path: &str, renderable: &'static Renderable) -> Self {
        RouteEntry {
            matcher: Matcher::exact(path),
            handler: Handler::Render(renderable),
        }
    }

    pub fn fallback(target: &str) -> Self {
        RouteEntry {
            matcher: Matcher::Wildcard,
            handler: Handler::Redirect(anchor(target)),
        }
    }

    pub fn kind(&self) -> Option<PageKind> {
        self.handler.renderable().map(Renderable::kind)
    }

    /// Every entry that renders catches its own failures; redirects have
    /// nothing to catch.
    pub fn has_boundary(&self) -> bool {
        self.handler.renderable().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(&'static str, String)>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Vec<(&'static str, String)>> for RouteParams {
    fn from(params: Vec<(&'static str, String)>) -> Self {
        RouteParams(params)
    }
}

/// A matched entry that renders, with the loader to run first.
#[derive(Debug)]
pub struct Route {
    pub renderable: &'static Renderable,
    pub loader: Option<Loader>,
    pub params: RouteParams,
}

impl Route {
    pub fn kind(&self) -> PageKind {
        self.renderable.kind()
    }
}

#[derive(Debug)]
pub enum Resolution<'a> {
    Render(Route),
    Redirect { to: &'a str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("route table has no wildcard redirect")]
    NoFallback,
}

/// Table row as exposed on `/api/routes`.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub path: String,
    pub kind: Option<PageKind>,
    pub loader: Option<Loader>,
    pub redirect: Option<String>,
    pub boundary: bool,
}

/// Ordered route table. Entries are tried front to back and the wildcard
/// always comes last, whatever order the entries were given in.
#[derive(Debug)]
pub struct Resolver {
    entries: Vec<RouteEntry>,
    fallback: String,
}

impl Resolver {
    /// Fails unless some wildcard entry redirects, so every path resolves.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, ResolverError> {
        let fallback = entries
            .iter()
            .find_map(|entry| match (&entry.matcher, &entry.handler) {
                (Matcher::Wildcard, Handler::Redirect(to)) => Some(to.clone()),
                _ => None,
            })
            .ok_or(ResolverError::NoFallback)?;
        Ok(Resolver::ordered(entries, fallback))
    }

    fn ordered(mut entries: Vec<RouteEntry>, fallback: String) -> Self {
        // stable, so specific routes keep their relative order
        entries.sort_by_key(|entry| entry.matcher == Matcher::Wildcard);
        Resolver { entries, fallback }
    }

    /// Routable registry pages first, then the fixed routes, then the
    /// redirect of everything else to the default page.
    pub fn from_registry(registry: &Registry) -> Self {
        let mut entries: Vec<RouteEntry> = registry
            .routable()
            .filter_map(|page| Some(RouteEntry::render(page.path, page.renderable?)))
            .collect();

        entries.push(RouteEntry {
            matcher: Matcher::Param {
                prefix: PROFILE_PREFIX.to_owned(),
                name: PROFILE_PARAM,
            },
            handler: Handler::Load {
                renderable: &pages::PROFILE,
                loader: Loader::GtfsRoute,
            },
        });
        entries.push(RouteEntry::render("data-research", &pages::DATA_RESEARCH));
        entries.push(RouteEntry::render("release", &pages::RELEASE));

        let fallback = anchor(registry.default_target().path);
        entries.push(RouteEntry::fallback(&fallback));
        Resolver::ordered(entries, fallback)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let path = normalize(path);
        for entry in &self.entries {
            let Some(params) = entry.matcher.matches(&path) else {
                continue;
            };
            return match &entry.handler {
                Handler::Redirect(to) => {
                    debug!(%path, %to, "no route matched, redirecting");
                    Resolution::Redirect { to }
                }
                Handler::Render(renderable) | Handler::Load { renderable, .. } => {
                    debug!(%path, route = %entry.matcher.pattern(), "route matched");
                    Resolution::Render(Route {
                        renderable: *renderable,
                        loader: entry.handler.loader(),
                        params,
                    })
                }
            };
        }

        Resolution::Redirect { to: &self.fallback }
    }

    pub fn summary(&self) -> Vec<RouteSummary> {
        self.entries
            .iter()
            .map(|entry| RouteSummary {
                path: entry.matcher.pattern(),
                kind: entry.kind(),
                loader: entry.handler.loader(),
                redirect: match &entry.handler {
                    Handler::Redirect(to) => Some(to.clone()),
                    _ => None,
                },
                boundary: entry.has_boundary(),
            })
            .collect()
    }
}

/// Drops query and fragment, anchors at `/` and strips trailing slashes.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    format!("/{}", path.trim_matches('/'))
}
