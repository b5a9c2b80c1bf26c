// Menu Builder: renders the activities selectbox and runs the selected page.
//
// One call is one render. The selection lives in the session under the
// caller's key; the chosen page is resolved against the activities directory
// and handed to its registered handler. Errors raised while running the page
// are shown on the surface and returned in the outcome, never propagated, so
// the menu is still there on the next interaction.

use crate::config::{ActivityCatalog, ActivityRecord};
use crate::error::ActivityError;
use crate::registry::{PageContext, PageRegistry};
use crate::session::SessionState;
use crate::surface::{Interaction, SelectBox, Surface};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Recognized menu options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuOptions {
    /// Render the control non-interactive.
    pub disabled: bool,
    /// Entry selected when the session holds no selection yet. Defaults to 0.
    pub default_index: Option<usize>,
}

/// Result of one render of the menu.
#[derive(Debug, Default)]
pub struct MenuOutcome {
    /// Name of the selected activity, `None` for an empty catalog.
    pub selected: Option<String>,
    /// Page path that was run (or attempted).
    pub script: Option<PathBuf>,
    /// Render-time error, already shown on the surface.
    pub error: Option<ActivityError>,
    /// The user dismissed the menu; nothing was run.
    pub closed: bool,
}

/// What a render works against: the page handlers, the user's session and
/// the surface the menu and pages draw on.
pub struct MenuContext<'a> {
    pub registry: &'a PageRegistry,
    pub session: &'a mut SessionState,
    pub surface: &'a mut dyn Surface,
}

impl<'a> MenuContext<'a> {
    pub fn new(
        registry: &'a PageRegistry,
        session: &'a mut SessionState,
        surface: &'a mut dyn Surface,
    ) -> Self {
        MenuContext {
            registry,
            session,
            surface,
        }
    }
}

impl MenuOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Render the activities menu and run the selected activity.
///
/// Only surface I/O failures are returned as `Err`; everything that goes
/// wrong with the page itself ends up in [`MenuOutcome::error`].
pub fn build_menu(
    catalog: &ActivityCatalog,
    label: &str,
    state_key: &str,
    base_dirpath: &Path,
    options: &MenuOptions,
    ctx: &mut MenuContext<'_>,
) -> io::Result<MenuOutcome> {
    let names = catalog.names();
    let mut current = ctx
        .session
        .get(state_key)
        .and_then(|name| catalog.position(name))
        .or_else(|| default_position(catalog, options));

    let interaction = ctx.surface.selectbox(&SelectBox {
        label,
        options: &names,
        index: current,
        disabled: options.disabled,
    })?;

    match interaction {
        Interaction::Selected(index) if options.disabled => {
            debug!("ignoring selection {index} on disabled menu `{state_key}`");
        }
        Interaction::Selected(index) if index < catalog.len() => current = Some(index),
        Interaction::Selected(index) => {
            warn!(
                "selection {index} out of range for menu `{state_key}` with {} entries",
                catalog.len()
            );
        }
        Interaction::Closed => {
            return Ok(MenuOutcome {
                selected: current.map(|i| names[i].to_string()),
                closed: true,
                ..MenuOutcome::default()
            });
        }
        Interaction::Unchanged => {}
    }

    let Some(activity) = current.and_then(|i| catalog.get_index(i)) else {
        return Ok(MenuOutcome::default());
    };

    if ctx.session.get(state_key) != Some(activity.name.as_str()) {
        info!("menu `{state_key}` selected `{}`", activity.name);
        ctx.session.set(state_key, activity.name.clone());
    }

    let script = resolve_script_path(base_dirpath, &activity.url);
    let error = match run_activity(activity, base_dirpath, ctx) {
        Ok(_) => None,
        Err(err) => {
            warn!("activity `{}` failed: {err}", activity.name);
            ctx.surface.error(&err.to_string());
            Some(err)
        }
    };

    Ok(MenuOutcome {
        selected: Some(activity.name.clone()),
        script: Some(script),
        error,
        closed: false,
    })
}

/// Join an activity url onto the activities directory. No existence check.
pub fn resolve_script_path(base_dirpath: &Path, url: &str) -> PathBuf {
    base_dirpath.join(url)
}

/// Resolve, read and run one activity page. Returns the page path on success.
///
/// A panicking page is reported as an execution error like any other.
pub fn run_activity(
    activity: &ActivityRecord,
    base_dirpath: &Path,
    ctx: &mut MenuContext<'_>,
) -> Result<PathBuf, ActivityError> {
    if !base_dirpath.is_dir() {
        return Err(ActivityError::NotADirectory(base_dirpath.to_path_buf()));
    }

    let script_path = resolve_script_path(base_dirpath, &activity.url);
    debug!(
        "activity `{}` resolved to {}",
        activity.name,
        script_path.display()
    );
    if !script_path.is_file() {
        return Err(ActivityError::ActivityNotFound(script_path));
    }

    let source = std::fs::read_to_string(&script_path).map_err(|source| ActivityError::Read {
        path: script_path.clone(),
        source,
    })?;

    let page = ctx.registry.page_for(&activity.url);
    let mut page_ctx = PageContext {
        activity,
        script_path: &script_path,
        source: &source,
        session: &mut *ctx.session,
        surface: &mut *ctx.surface,
    };
    let result = panic::catch_unwind(AssertUnwindSafe(|| page.render(&mut page_ctx)))
        .unwrap_or_else(|payload| Err(anyhow!("page panicked: {}", panic_message(&*payload))));

    result.map_err(|source| ActivityError::ActivityExecutionError {
        name: activity.name.clone(),
        source,
    })?;
    Ok(script_path)
}

fn default_position(catalog: &ActivityCatalog, options: &MenuOptions) -> Option<usize> {
    if catalog.is_empty() {
        return None;
    }
    match options.default_index {
        Some(index) if index < catalog.len() => Some(index),
        Some(index) => {
            warn!(
                "default index {index} out of range for {} activities; using 0",
                catalog.len()
            );
            Some(0)
        }
        None => Some(0),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
