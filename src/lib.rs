// Library root
// -----------
// This crate reads a list of "activities" (pages) from a YAML file and
// renders a selection menu that runs the page behind the chosen entry.
//
// Module responsibilities:
// - `config`: Activity Loader. Parses the YAML catalog (local file or URL)
//   into an ordered, name-unique `ActivityCatalog`.
// - `menu`: Menu Builder. Renders the selectbox, tracks the selection in the
//   session, resolves the page path and dispatches to its handler.
// - `registry`: statically linked page handlers keyed by activity `url`.
// - `session`: explicit per-session key/value state.
// - `surface`: the rendering surface (terminal or recording).
// - `error`: load-time and render-time error types.
pub mod config;
pub mod error;
pub mod menu;
pub mod registry;
pub mod session;
pub mod surface;

pub use config::{load, load_source, load_yaml, ActivityCatalog, ActivityRecord};
pub use error::{ActivityError, ConfigError};
pub use menu::{
    build_menu, resolve_script_path, run_activity, MenuContext, MenuOptions,
    MenuOutcome,
};
pub use registry::{Page, PageContext, PageRegistry, StaticPage};
pub use session::SessionState;
pub use surface::{Element, Interaction, RecordingSurface, SelectBox, Surface, TerminalSurface};
