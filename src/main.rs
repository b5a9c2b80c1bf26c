// Demo application for the activities menu.
// - Configuration comes from environment variables (see `AppConfig`).
// - Each loop iteration is one render: the menu asks for a choice and runs
//   the selected page. Esc closes the menu and exits.

use activities_menu::{
    build_menu, load_source, ActivityCatalog, MenuContext, MenuOptions, PageContext,
    PageRegistry, SessionState, Surface, TerminalSurface,
};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MENU_KEY: &str = "activitiesMenu";
const MENU_LABEL: &str = "Activities:";

struct AppConfig {
    activities_filepath: String,
    activities_dirpath: PathBuf,
    session_file: PathBuf,
}

impl AppConfig {
    /// Read `ACTIVITIES_FILEPATH` (path or URL), `ACTIVITIES_DIRPATH` and
    /// `ACTIVITIES_SESSION_FILE`, falling back to the bundled demo app.
    fn from_env() -> Self {
        let activities_filepath = std::env::var("ACTIVITIES_FILEPATH")
            .unwrap_or_else(|_| "./demo_app/app_activities.yaml".into());
        let activities_dirpath = std::env::var("ACTIVITIES_DIRPATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./demo_app/activities/"));
        let session_file = std::env::var("ACTIVITIES_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| SessionState::default_path());
        AppConfig {
            activities_filepath,
            activities_dirpath,
            session_file,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let config = AppConfig::from_env();

    let catalog = load_catalog(&config.activities_filepath)?;
    let registry = demo_registry(&catalog);
    let activities_dirpath = absolute(&config.activities_dirpath)?;
    let mut session = SessionState::load_from(&config.session_file)?;
    let mut surface = TerminalSurface::new();

    surface.title("Activities menu demo");
    surface.caption(&format!("Pages from {}", activities_dirpath.display()));

    loop {
        let mut ctx = MenuContext::new(&registry, &mut session, &mut surface);
        let outcome = build_menu(
            &catalog,
            MENU_LABEL,
            MENU_KEY,
            &activities_dirpath,
            &MenuOptions::default(),
            &mut ctx,
        )?;
        session.persist_to(&config.session_file)?;
        if outcome.closed || outcome.selected.is_none() {
            break;
        }
    }
    Ok(())
}

fn load_catalog(source: &str) -> Result<ActivityCatalog> {
    // indicatif's spinner keeps the terminal alive while a remote file loads.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Loading activities from {source}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let catalog = load_source(source);
    spinner.finish_and_clear();
    catalog.with_context(|| format!("Failed to load activities from {source}"))
}

/// Handlers for pages that do more than show their own text.
fn demo_registry(catalog: &ActivityCatalog) -> PageRegistry {
    let listing: Vec<(String, String)> = catalog
        .iter()
        .map(|record| (record.name.clone(), record.description.clone()))
        .collect();

    let mut registry = PageRegistry::new();
    registry.register_fn("overview.page", move |ctx: &mut PageContext<'_>| {
        ctx.surface.title(&ctx.activity.name);
        ctx.surface.caption(&ctx.activity.description);
        for (name, description) in &listing {
            ctx.surface.write(&format!("- {name}: {description}"));
        }
        let visits = ctx
            .session
            .get("overviewVisits")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;
        ctx.session.set("overviewVisits", visits.to_string());
        ctx.surface.caption(&format!("Opened {visits} time(s) this session"));
        Ok(())
    });
    registry.register_fn("broken.page", |ctx: &mut PageContext<'_>| {
        anyhow::bail!("{} is not available yet", ctx.script_path.display())
    });
    registry
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}
