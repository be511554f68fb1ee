use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    boundary::{ErrorDisplay, Failure},
    loader::RecordSource,
    pages::SearchParams,
    render::{View, render_route},
    resolver::{Resolution, Resolver},
};

pub type NavigationId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Rendered(View),
    Errored(ErrorDisplay),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Resolving)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub id: NavigationId,
    /// Where the navigation ended up, after any redirect.
    pub location: String,
    pub redirected_from: Option<String>,
    pub phase: Phase,
}

struct Inner {
    resolver: Arc<Resolver>,
    source: Arc<dyn RecordSource>,
    state: watch::Sender<ViewState>,
    inflight: Mutex<CancellationToken>,
    generation: AtomicU64,
}

/// One interactive navigation session. The latest navigation always wins:
/// starting a new one cancels the previous one and a superseded result is
/// never applied to the view.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    pub fn new(resolver: Arc<Resolver>, source: Arc<dyn RecordSource>) -> Self {
        let (state, _) = watch::channel(ViewState {
            id: 0,
            location: String::new(),
            redirected_from: None,
            phase: Phase::Resolving,
        });

        Navigator {
            inner: Arc::new(Inner {
                resolver,
                source,
                state,
                inflight: Mutex::new(CancellationToken::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Starts a navigation and returns immediately. Must be called from
    /// within a tokio runtime.
    pub fn navigate(&self, target: &str) -> NavigationId {
        let inner = &self.inner;
        let token = CancellationToken::new();
        let id = {
            let mut inflight = inner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            // ids are taken under the lock, so the replaced token is always older
            let id = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            std::mem::replace(&mut *inflight, token.clone()).cancel();
            id
        };

        let (path, _) = split(target);
        let (location, redirected_from) = match inner.resolver.resolve(path) {
            Resolution::Redirect { to } => (to.to_owned(), Some(target.to_owned())),
            Resolution::Render(_) => (target.to_owned(), None),
        };
        debug!(id, target, %location, "navigation started");

        inner.state.send_if_modified(|current| {
            if current.id > id {
                return false;
            }
            *current = ViewState {
                id,
                location: location.clone(),
                redirected_from,
                phase: Phase::Resolving,
            };
            true
        });

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let phase = tokio::select! {
                _ = token.cancelled() => {
                    debug!(id, "navigation superseded before it settled");
                    return;
                }
                phase = settle(&inner.resolver, inner.source.as_ref(), &location) => phase,
            };

            let applied = inner.state.send_if_modified(|current| {
                if current.id != id {
                    return false;
                }
                current.phase = phase;
                true
            });
            if !applied {
                debug!(id, "dropping result of superseded navigation");
            }
        });

        id
    }

    pub fn current(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Waits until the most recent navigation is rendered or errored.
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.inner.state.subscribe();
        let generation = &self.inner.generation;
        match rx
            .wait_for(|s| s.id == generation.load(Ordering::SeqCst) && s.phase.is_terminal())
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => self.current(),
        }
    }
}

fn split(target: &str) -> (&str, Option<&str>) {
    let target = target.split('#').next().unwrap_or_default();
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

async fn settle(resolver: &Resolver, source: &dyn RecordSource, location: &str) -> Phase {
    let (path, query) = split(location);
    let query = SearchParams::parse(query);

    match resolver.resolve(path) {
        Resolution::Render(route) => match render_route(&route, path, &query, source).await {
            Ok(view) => Phase::Rendered(view),
            Err(display) => Phase::Errored(display),
        },
        Resolution::Redirect { to } => Phase::Errored(ErrorDisplay {
            route: path.to_owned(),
            failure: Failure::Render,
            message: format!("redirect target {to} is not a page"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::AtomicUsize,
        time::Duration,
    };

    use axum::http::StatusCode;
    use futures_util::{FutureExt, future::BoxFuture};
    use serde_json::{Value, json};
    use tokio::sync::Semaphore;

    use super::*;
    use crate::{loader::LoadError, pages::PageKind, registry::Registry};

    /// Holds every fetch until the test lets it through.
    struct GatedSource {
        gate: Semaphore,
        completed: AtomicUsize,
    }

    impl GatedSource {
        fn new() -> Self {
            GatedSource {
                gate: Semaphore::new(0),
                completed: AtomicUsize::new(0),
            }
        }
    }

    impl RecordSource for GatedSource {
        fn fetch_route<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, LoadError>> {
            async move {
                let _permit = self.gate.acquire().await.unwrap();
                self.completed.fetch_add(1, Ordering::SeqCst);
                match id {
                    "bad-id" => Err(LoadError::Status(StatusCode::BAD_GATEWAY)),
                    _ => Ok(json!({ "id": id, "route_short_name": "5" })),
                }
            }
            .boxed()
        }
    }

    fn navigator(source: Arc<GatedSource>) -> Navigator {
        Navigator::new(Arc::new(Resolver::from_registry(Registry::builtin())), source)
    }

    fn rendered(state: &ViewState) -> &View {
        match &state.phase {
            Phase::Rendered(view) => view,
            other => panic!("expected a rendered view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn renders_static_page() {
        let nav = navigator(Arc::new(GatedSource::new()));
        let id = nav.navigate("/about");
        let state = nav.settled().await;
        assert_eq!(state.id, id);
        assert_eq!(state.location, "/about");
        assert_eq!(rendered(&state).kind, PageKind::About);
    }

    #[tokio::test]
    async fn unknown_path_lands_on_dashboard() {
        let nav = navigator(Arc::new(GatedSource::new()));
        nav.navigate("/nonexistent-path?x=1");
        let state = nav.settled().await;
        assert_eq!(state.location, "/dashboard");
        assert_eq!(state.redirected_from.as_deref(), Some("/nonexistent-path?x=1"));
        assert_eq!(rendered(&state).kind, PageKind::Dashboard);
    }

    #[tokio::test]
    async fn profile_waits_for_record() {
        let source = Arc::new(GatedSource::new());
        let nav = navigator(source.clone());
        nav.navigate("/profile/12345");
        assert_eq!(nav.current().phase, Phase::Resolving);

        source.gate.add_permits(1);
        let state = nav.settled().await;
        let view = rendered(&state);
        assert_eq!(view.kind, PageKind::Profile);
        assert!(view.body.contains("<td>5</td>"));
    }

    #[tokio::test]
    async fn failed_fetch_is_contained_to_the_route() {
        let source = Arc::new(GatedSource::new());
        source.gate.add_permits(1);
        let nav = navigator(source);

        nav.navigate("/profile/bad-id");
        let state = nav.settled().await;
        let Phase::Errored(display) = &state.phase else {
            panic!("expected the error display, got {:?}", state.phase);
        };
        assert_eq!(display.failure, Failure::Load);
        assert_eq!(display.route, "/profile/bad-id");

        nav.navigate("/map");
        assert_eq!(rendered(&nav.settled().await).kind, PageKind::RealtimeMap);
    }

    #[tokio::test]
    async fn superseded_fetch_is_never_applied() {
        let source = Arc::new(GatedSource::new());
        let nav = navigator(source.clone());

        let first = nav.navigate("/profile/12345");
        let second = nav.navigate("/gaps_patterns");
        assert!(second > first);
        assert_eq!(rendered(&nav.settled().await).kind, PageKind::GapsPatterns);

        source.gate.add_permits(1);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(source.completed.load(Ordering::SeqCst), 0);
        let state = nav.current();
        assert_eq!(state.id, second);
        assert_eq!(rendered(&state).kind, PageKind::GapsPatterns);
    }

    #[tokio::test]
    async fn subscribers_see_resolving_then_settled() {
        let source = Arc::new(GatedSource::new());
        let nav = navigator(source.clone());
        let mut rx = nav.subscribe();

        let id = nav.navigate("/profile/7");
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase, Phase::Resolving);

        source.gate.add_permits(1);
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.id, id);
        assert_eq!(rendered(&state).kind, PageKind::Profile);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_navigations_settle_on_the_newest() {
        let nav = navigator(Arc::new(GatedSource::new()));

        for _ in 0..200 {
            let barrier = Arc::new(tokio::sync::Barrier::new(2));
            let tasks: Vec<_> = ["/about", "/map"]
                .into_iter()
                .map(|target| {
                    let nav = nav.clone();
                    let barrier = barrier.clone();
                    tokio::spawn(async move {
                        barrier.wait().await;
                        nav.navigate(target)
                    })
                })
                .collect();

            let mut newest = 0;
            for task in tasks {
                newest = newest.max(task.await.unwrap());
            }

            let state = tokio::time::timeout(Duration::from_secs(5), nav.settled())
                .await
                .expect("the newest navigation never settled");
            assert_eq!(state.id, newest);
            assert!(matches!(state.phase, Phase::Rendered(_)), "{:?}", state.phase);
        }
    }
}
