use std::{fmt, sync::OnceLock};

use tracing::debug;

use crate::pages::{Page, PageKind};

/// A page unit that is only built the first time its route resolves.
/// Once built it is kept for the rest of the process.
pub struct Renderable {
    kind: PageKind,
    factory: fn() -> Box<dyn Page>,
    unit: OnceLock<Box<dyn Page>>,
}

impl Renderable {
    pub const fn new(kind: PageKind, factory: fn() -> Box<dyn Page>) -> Self {
        Renderable {
            kind,
            factory,
            unit: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn get(&self) -> &dyn Page {
        self.unit
            .get_or_init(|| {
                debug!(page = ?self.kind, "materializing page unit");
                (self.factory)()
            })
            .as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.unit.get().is_some()
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Renderable")
            .field("kind", &self.kind)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::pages::{PageContext, RenderError};

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Page for Counted {
        fn title(&self) -> &str {
            "counted"
        }

        fn render(&self, _ctx: &PageContext) -> Result<String, RenderError> {
            Ok("<p>counted</p>".to_owned())
        }
    }

    fn counted() -> Box<dyn Page> {
        BUILT.fetch_add(1, Ordering::SeqCst);
        Box::new(Counted)
    }

    static COUNTED: Renderable = Renderable::new(PageKind::About, counted);

    #[test]
    fn materializes_once_on_first_use() {
        assert!(!COUNTED.is_materialized());
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        assert_eq!(COUNTED.get().title(), "counted");
        assert_eq!(COUNTED.get().title(), "counted");

        assert!(COUNTED.is_materialized());
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
        assert_eq!(COUNTED.kind(), PageKind::About);
    }
}
