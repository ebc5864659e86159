#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Bundler plugin wiring for live-refresh entry injection.
//!
//! [`RefreshPlugin`] rewrites a bundler configuration's `entry` so the
//! client-side refresh machinery loads before any user module, and answers
//! load requests for the injected runtime modules from embedded sources.
//! The runtime modules are addressed by virtual specifiers (ids that never
//! touch the filesystem), so the injection needs no resolution step.

mod runtime;

pub use runtime::{LEGACY_SOCKET_SHIM_JS, OVERLAY_CLIENT_JS, REFRESH_RUNTIME_JS};

use reheat_core::{inject, Entry, RefreshOptions, RuntimeModules};

/// Virtual module specifier for the live-update client runtime.
pub const REFRESH_RUNTIME_ID: &str = "/@reheat/runtime";

/// Virtual module specifier for the legacy socket transport shim.
pub const LEGACY_SOCKET_SHIM_ID: &str = "/@reheat/legacy-socket";

/// Virtual module specifier for the error overlay client.
pub const OVERLAY_CLIENT_ID: &str = "/@reheat/overlay";

/// Runtime module specifiers pointing at this plugin's virtual modules.
#[must_use]
pub fn virtual_runtime_modules() -> RuntimeModules {
    RuntimeModules {
        refresh_runtime: REFRESH_RUNTIME_ID.to_string(),
        socket_shim: LEGACY_SOCKET_SHIM_ID.to_string(),
        overlay_entry: OVERLAY_CLIENT_ID.to_string(),
    }
}

/// Build mode of the surrounding bundler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

/// The configuration surface the plugin rewrites.
#[derive(Debug)]
pub struct BundlerConfig {
    /// Build mode; injection only happens in development.
    pub mode: Mode,
    /// The entry description, substituted in place.
    pub entry: Entry,
}

/// Live-refresh plugin: entry rewriting plus virtual runtime modules.
#[derive(Debug, Clone, Default)]
pub struct RefreshPlugin {
    options: RefreshOptions,
}

impl RefreshPlugin {
    /// Create the plugin with the given user options.
    #[must_use]
    pub fn new(options: RefreshOptions) -> Self {
        Self { options }
    }

    /// Plugin name for debugging and log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        "reheat:refresh"
    }

    /// Config hook: prepend the refresh startup modules to the entry.
    ///
    /// Production builds are left untouched. Cannot fail: the typed
    /// transform is total and normalization only fills defaults.
    pub fn config(&self, config: &mut BundlerConfig) {
        if config.mode == Mode::Production {
            tracing::debug!(plugin = self.name(), "production build, entry left untouched");
            return;
        }

        let options = self.options.normalize(&virtual_runtime_modules());
        tracing::debug!(
            plugin = self.name(),
            modules = ?options.injected_modules(),
            "prepending refresh startup modules",
        );

        let entry = std::mem::replace(&mut config.entry, Entry::List(Vec::new()));
        config.entry = inject(entry, &options);
    }

    /// Serve the embedded source of a virtual runtime module.
    ///
    /// Returns `None` for ids this plugin does not provide, letting the
    /// next loader handle them.
    #[must_use]
    pub fn load_virtual(&self, id: &str) -> Option<&'static str> {
        match id {
            REFRESH_RUNTIME_ID => Some(REFRESH_RUNTIME_JS),
            LEGACY_SOCKET_SHIM_ID => Some(LEGACY_SOCKET_SHIM_JS),
            OVERLAY_CLIENT_ID => Some(OVERLAY_CLIENT_JS),
            _ => None,
        }
    }
}
