//! Bevy integration for tag levels.
//!
//! Provides:
//! - `TagLevelsPlugin`: builder-pattern plugin inserting the shared level table as a Resource
//! - `TagLevelsResource`: the resource systems read and update
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use tag_level::bevy::*;
//! use tag_level::{log_tags, Level, TagLevelsConfig};
//!
//! log_tags! {
//!     pub mod tags {
//!         #[level = warn]
//!         NET = "net";
//!     }
//! }
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(TagLevelsPlugin::from_config(
//!             TagLevelsConfig::new().presets(tags::PRESETS),
//!         ))
//!         .add_systems(Update, quiet_network)
//!         .run();
//! }
//!
//! fn quiet_network(levels: Res<TagLevelsResource>) {
//!     levels.set_level(tags::NET, Level::Error);
//! }
//! ```

use bevy::prelude::*;
use std::ops::Deref;

use crate::{SharedTagLevels, TagLevelsConfig};

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin for per-tag log levels.
#[derive(Default)]
pub struct TagLevelsPlugin {
    config: TagLevelsConfig,
}

impl TagLevelsPlugin {
    /// Plugin with the default configuration: no presets, default level
    /// `Verbose`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugin built from a runtime configuration, presets included.
    pub fn from_config(config: TagLevelsConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TagLevelsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TagLevelsResource(SharedTagLevels::from_config(
            &self.config,
        )));
    }
}

// =============================================================================
// Resource
// =============================================================================

/// The shared level table as a Bevy resource.
///
/// Access is through `&self`; the table synchronizes internally, so `Res`
/// is enough for both reading and updating levels.
#[derive(Resource, Debug, Default)]
pub struct TagLevelsResource(pub SharedTagLevels<'static>);

impl Deref for TagLevelsResource {
    type Target = SharedTagLevels<'static>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// =============================================================================
// Tests
// =============================================================================
