//! User-facing plugin options and their normalization.
//!
//! `RefreshOptions` is what a user writes in their tooling config
//! (camelCase, everything optional). [`RefreshOptions::normalize`] turns it
//! into the read-only [`InjectOptions`] the transform consumes: defaults
//! filled in, the port stringified, empty strings dropped, and the overlay
//! setting resolved against the built-in overlay entry.

use serde::{Deserialize, Serialize};

use crate::inject::{InjectOptions, OverlayEntry};

/// Options accepted from the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshOptions {
    /// Use the legacy socket transport shim instead of the native one.
    pub use_legacy_socket: bool,
    /// Host the overlay client connects its socket to.
    pub socket_host: Option<String>,
    /// Port the overlay client connects its socket to.
    pub socket_port: Option<u16>,
    /// Endpoint path of the socket.
    pub socket_path: Option<String>,
    /// Error overlay: `false` (off), `true` (built-in entry), or a custom
    /// entry object.
    pub overlay: OverlaySetting,
}

/// The overlay setting as authored: a boolean toggle or a custom entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverlaySetting {
    /// `overlay: true` / `overlay: false`.
    Enabled(bool),
    /// `overlay: { "entry": "./module" }`.
    Custom(OverlayEntry),
}

impl Default for OverlaySetting {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

/// Pre-resolved specifiers for the fixed runtime modules.
///
/// Resolution is the caller's concern: the integration layer decides what a
/// specifier means (a file on disk, a virtual module id) before the
/// transform runs.
#[derive(Debug, Clone)]
pub struct RuntimeModules {
    /// The live-update client runtime.
    pub refresh_runtime: String,
    /// The legacy socket transport shim.
    pub socket_shim: String,
    /// The built-in error overlay entry, used when `overlay: true`.
    pub overlay_entry: String,
}

impl RefreshOptions {
    /// Resolve the user options into transform-ready [`InjectOptions`].
    ///
    /// Cannot fail: normalization only fills defaults, formats the port,
    /// and drops empty strings.
    #[must_use]
    pub fn normalize(&self, modules: &RuntimeModules) -> InjectOptions {
        InjectOptions {
            use_legacy_socket: self.use_legacy_socket,
            socket_host: non_empty(self.socket_host.clone()),
            socket_port: self.socket_port.map(|port| port.to_string()),
            socket_path: non_empty(self.socket_path.clone()),
            overlay: match &self.overlay {
                OverlaySetting::Enabled(false) => None,
                OverlaySetting::Enabled(true) => Some(OverlayEntry {
                    entry: modules.overlay_entry.clone(),
                }),
                OverlaySetting::Custom(overlay) => Some(overlay.clone()),
            },
            socket_shim: modules.socket_shim.clone(),
            refresh_runtime: modules.refresh_runtime.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
