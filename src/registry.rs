// Page registry: maps each activity `url` to a statically linked handler.
// Handlers are registered once at startup; the menu only looks them up.
// A url with no registered handler is rendered by the fallback page, which
// by default shows the page file as text.

use crate::config::ActivityRecord;
use crate::session::SessionState;
use crate::surface::Surface;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

/// Everything a page sees while it renders. Output goes to `surface` as if it
/// were produced at the menu's call site.
pub struct PageContext<'a> {
    pub activity: &'a ActivityRecord,
    /// Resolved path of the page file.
    pub script_path: &'a Path,
    /// Contents of the page file, read at render time.
    pub source: &'a str,
    pub session: &'a mut SessionState,
    pub surface: &'a mut dyn Surface,
}

pub trait Page {
    fn render(&self, ctx: &mut PageContext<'_>) -> Result<()>;
}

impl<F> Page for F
where
    F: Fn(&mut PageContext<'_>) -> Result<()>,
{
    fn render(&self, ctx: &mut PageContext<'_>) -> Result<()> {
        self(ctx)
    }
}

/// Renders the page file itself: `# ` lines become titles, `> ` lines
/// captions, everything else plain text. Blank lines are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPage;

impl Page for StaticPage {
    fn render(&self, ctx: &mut PageContext<'_>) -> Result<()> {
        for line in ctx.source.lines() {
            let line = line.trim_end();
            if let Some(title) = line.strip_prefix("# ") {
                ctx.surface.title(title);
            } else if let Some(caption) = line.strip_prefix("> ") {
                ctx.surface.caption(caption);
            } else if !line.is_empty() {
                ctx.surface.write(line);
            }
        }
        Ok(())
    }
}

pub struct PageRegistry {
    pages: HashMap<String, Box<dyn Page>>,
    fallback: Box<dyn Page>,
}

impl Default for PageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRegistry {
    pub fn new() -> Self {
        PageRegistry {
            pages: HashMap::new(),
            fallback: Box::new(StaticPage),
        }
    }

    /// Replace the handler used for urls nobody registered.
    pub fn with_fallback(mut self, page: impl Page + 'static) -> Self {
        self.fallback = Box::new(page);
        self
    }

    /// Register a handler for an activity url. A second registration for the
    /// same url replaces the first.
    pub fn register(&mut self, url: &str, page: impl Page + 'static) -> &mut Self {
        self.pages.insert(url.to_string(), Box::new(page));
        self
    }

    /// Same as [`PageRegistry::register`], spelled for closures so their
    /// argument type is inferred.
    pub fn register_fn<F>(&mut self, url: &str, page: F) -> &mut Self
    where
        F: Fn(&mut PageContext<'_>) -> Result<()> + 'static,
    {
        self.register(url, page)
    }

    pub fn is_registered(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    /// Handler for `url`, or the fallback.
    pub fn page_for(&self, url: &str) -> &dyn Page {
        self.pages
            .get(url)
            .map(|page| page.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Element, RecordingSurface};

    fn record() -> ActivityRecord {
        ActivityRecord {
            name: "Home".into(),
            description: "Home page".into(),
            url: "home.page".into(),
        }
    }

    #[test]
    fn static_page_renders_lines() {
        let activity = record();
        let mut session = SessionState::new();
        let mut surface = RecordingSurface::new();
        let mut ctx = PageContext {
            activity: &activity,
            script_path: Path::new("/tmp/home.page"),
            source: "# Welcome\n\n> start here\nHello\n",
            session: &mut session,
            surface: &mut surface,
        };
        StaticPage.render(&mut ctx).unwrap();
        assert_eq!(
            surface.elements(),
            &[
                Element::Title("Welcome".into()),
                Element::Caption("start here".into()),
                Element::Text("Hello".into()),
            ]
        );
    }

    #[test]
    fn registered_handler_wins_over_fallback() {
        let mut registry = PageRegistry::new();
        registry.register_fn("home.page", |ctx| {
            ctx.session.set("visited", ctx.activity.name.clone());
            ctx.surface.write("custom");
            Ok(())
        });
        assert!(registry.is_registered("home.page"));
        assert!(!registry.is_registered("other.page"));

        let activity = record();
        let mut session = SessionState::new();
        let mut surface = RecordingSurface::new();
        let mut ctx = PageContext {
            activity: &activity,
            script_path: Path::new("/tmp/home.page"),
            source: "# ignored",
            session: &mut session,
            surface: &mut surface,
        };
        registry.page_for("home.page").render(&mut ctx).unwrap();
        assert_eq!(surface.texts(), vec!["custom"]);
        assert_eq!(session.get("visited"), Some("Home"));
    }
}
