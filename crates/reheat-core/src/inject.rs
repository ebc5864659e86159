//! The entry-injection transform.
//!
//! Prepends the live-refresh startup modules to every leaf of a bundler
//! entry description while preserving the description's shape: a single
//! path widens to a list, a list keeps its paths after the injected
//! prefix, a named map keeps its keys and order with each value injected
//! independently, and a factory is wrapped so its eventual result is
//! injected the same way. The transform is pure; its only side effect is
//! invoking the caller's factory, and only when the consumer does.

use std::fmt::Write as _;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::entry::{Entry, FactoryError};
use crate::error::Error;

/// Fully-resolved injection configuration.
///
/// Constructed once per build configuration (see
/// [`RefreshOptions::normalize`](crate::options::RefreshOptions::normalize))
/// and read-only for the lifetime of the transform call.
#[derive(Debug, Clone)]
pub struct InjectOptions {
    /// Prepend the legacy socket shim before the runtime.
    pub use_legacy_socket: bool,
    /// Socket host forwarded to the overlay client via its query string.
    pub socket_host: Option<String>,
    /// Socket port, already formatted for the query string.
    pub socket_port: Option<String>,
    /// Socket endpoint path forwarded to the overlay client.
    pub socket_path: Option<String>,
    /// Error overlay entry module, if the overlay is enabled.
    pub overlay: Option<OverlayEntry>,
    /// Pre-resolved specifier of the legacy socket shim.
    pub socket_shim: String,
    /// Pre-resolved specifier of the live-update runtime.
    pub refresh_runtime: String,
}

/// The error overlay's entry module.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OverlayEntry {
    /// Module specifier the overlay client is loaded from.
    pub entry: String,
}

impl InjectOptions {
    /// Create options that inject only the live-update runtime.
    #[must_use]
    pub fn new(refresh_runtime: impl Into<String>, socket_shim: impl Into<String>) -> Self {
        Self {
            use_legacy_socket: false,
            socket_host: None,
            socket_port: None,
            socket_path: None,
            overlay: None,
            socket_shim: socket_shim.into(),
            refresh_runtime: refresh_runtime.into(),
        }
    }

    /// Enable the legacy socket shim.
    #[must_use]
    pub fn with_legacy_socket(mut self, enabled: bool) -> Self {
        self.use_legacy_socket = enabled;
        self
    }

    /// Set the socket host forwarded to the overlay client.
    #[must_use]
    pub fn with_socket_host(mut self, host: impl Into<String>) -> Self {
        self.socket_host = Some(host.into());
        self
    }

    /// Set the socket port forwarded to the overlay client.
    #[must_use]
    pub fn with_socket_port(mut self, port: impl Into<String>) -> Self {
        self.socket_port = Some(port.into());
        self
    }

    /// Set the socket endpoint path forwarded to the overlay client.
    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// Enable the error overlay with the given entry module.
    #[must_use]
    pub fn with_overlay(mut self, entry: impl Into<String>) -> Self {
        self.overlay = Some(OverlayEntry {
            entry: entry.into(),
        });
        self
    }

    /// The ordered list of module specifiers prepended at every leaf.
    ///
    /// Order is fixed: the legacy socket shim (if enabled) must initialize
    /// before the live-update runtime attaches, and the overlay entry (if
    /// configured) comes last so it can observe socket events.
    #[must_use]
    pub fn injected_modules(&self) -> Vec<String> {
        let mut modules = Vec::with_capacity(3);
        if self.use_legacy_socket {
            modules.push(self.socket_shim.clone());
        }
        modules.push(self.refresh_runtime.clone());
        if let Some(overlay) = &self.overlay {
            modules.push(format!("{}{}", overlay.entry, self.overlay_query()));
        }
        modules
    }

    /// Query string appended to the overlay entry. Unset or empty socket
    /// parameters are omitted entirely, never emitted with an empty value.
    fn overlay_query(&self) -> String {
        let mut query = String::from("?options");
        if let Some(host) = self.socket_host.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(query, "&sockHost={host}");
        }
        if let Some(port) = self.socket_port.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(query, "&sockPort={port}");
        }
        if let Some(path) = self.socket_path.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(query, "&sockPath={path}");
        }
        query
    }
}

/// Prepend the startup modules to every leaf of `entry`, preserving shape.
///
/// A single path becomes a list (multiple modules must now load at that
/// position); each named value is injected independently so every chunk
/// gets its own copy of the prefix; a factory is re-wrapped so the
/// injection applies to whatever it eventually resolves to, with the
/// original arguments forwarded unchanged and factory failures passed
/// through untouched.
#[must_use]
pub fn inject(entry: Entry, options: &InjectOptions) -> Entry {
    inject_prefixed(entry, &options.injected_modules(), options)
}

fn inject_prefixed(entry: Entry, injected: &[String], options: &InjectOptions) -> Entry {
    match entry {
        Entry::Single(path) => {
            let mut paths = injected.to_vec();
            paths.push(path);
            Entry::List(paths)
        }
        Entry::List(original) => {
            let mut paths = injected.to_vec();
            paths.extend(original);
            Entry::List(paths)
        }
        Entry::Named(entries) => Entry::Named(
            entries
                .into_iter()
                .map(|(key, nested)| (key, inject_prefixed(nested, injected, options)))
                .collect(),
        ),
        Entry::Dynamic(factory) => {
            let options = options.clone();
            Entry::Dynamic(Arc::new(move |args| {
                let factory = Arc::clone(&factory);
                let options = options.clone();
                let fut: BoxFuture<'static, Result<Entry, FactoryError>> = Box::pin(async move {
                    let resolved = factory(args).await?;
                    Ok(inject(resolved, &options))
                });
                fut
            }))
        }
    }
}

/// Inject into a raw JSON entry value, as authored in a bundler config.
///
/// Fails synchronously with [`Error::UnrecognizedEntry`] for values that
/// are not a string, an array of strings, or a keyed map — before any
/// deferred resolution could occur.
pub fn inject_value(value: &serde_json::Value, options: &InjectOptions) -> Result<serde_json::Value, Error> {
    let entry = Entry::from_value(value)?;
    inject(entry, options).to_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{FactoryArgs, FactoryError};
    use serde_json::json;
    use std::sync::Mutex;

    fn runtime_only() -> InjectOptions {
        InjectOptions::new("/@reheat/runtime", "/@reheat/legacy-socket")
    }

    #[test]
    fn test_single_widens_to_list() {
        let injected = inject(Entry::single("./src/index.js"), &runtime_only());
        assert_eq!(
            injected,
            Entry::list(["/@reheat/runtime", "./src/index.js"])
        );
    }

    #[test]
    fn test_list_keeps_original_order_after_prefix() {
        let injected = inject(Entry::list(["./a.js", "./b.js"]), &runtime_only());
        assert_eq!(
            injected,
            Entry::list(["/@reheat/runtime", "./a.js", "./b.js"])
        );
    }

    #[test]
    fn test_named_injects_each_value_independently() {
        let injected = inject(
            Entry::named([
                ("app", Entry::single("./a.js")),
                ("admin", Entry::single("./b.js")),
            ]),
            &runtime_only(),
        );

        let Entry::Named(entries) = injected else {
            panic!("expected a named entry");
        };
        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["app", "admin"]);
        assert_eq!(
            entries["app"],
            Entry::list(["/@reheat/runtime", "./a.js"])
        );
        assert_eq!(
            entries["admin"],
            Entry::list(["/@reheat/runtime", "./b.js"])
        );
    }

    #[test]
    fn test_named_recurses_through_nesting() {
        let injected = inject(
            Entry::named([(
                "pages",
                Entry::named([("home", Entry::list(["./home.js"]))]),
            )]),
            &runtime_only(),
        );

        let Entry::Named(outer) = injected else {
            panic!("expected a named entry");
        };
        let Entry::Named(pages) = &outer["pages"] else {
            panic!("expected a nested named entry");
        };
        assert_eq!(
            pages["home"],
            Entry::list(["/@reheat/runtime", "./home.js"])
        );
    }

    #[test]
    fn test_injected_modules_full_order() {
        let options = runtime_only()
            .with_legacy_socket(true)
            .with_overlay("./overlay");
        assert_eq!(
            options.injected_modules(),
            vec![
                "/@reheat/legacy-socket".to_string(),
                "/@reheat/runtime".to_string(),
                "./overlay?options".to_string(),
            ]
        );
    }

    #[test]
    fn test_injected_modules_is_deterministic() {
        let options = runtime_only()
            .with_legacy_socket(true)
            .with_overlay("./overlay")
            .with_socket_port("9000");
        assert_eq!(options.injected_modules(), options.injected_modules());
    }

    #[test]
    fn test_overlay_query_includes_only_set_params() {
        let options = runtime_only()
            .with_overlay("./overlay")
            .with_socket_host("localhost")
            .with_socket_path("/ws");
        assert_eq!(
            options.injected_modules()[1],
            "./overlay?options&sockHost=localhost&sockPath=/ws"
        );
    }

    #[test]
    fn test_overlay_query_omits_empty_values() {
        let options = runtime_only()
            .with_overlay("./overlay")
            .with_socket_host("")
            .with_socket_port("");
        assert_eq!(options.injected_modules()[1], "./overlay?options");
    }

    #[test]
    fn test_overlay_with_host_scenario() {
        let options = runtime_only()
            .with_overlay("./overlay")
            .with_socket_host("localhost");
        let injected = inject(Entry::single("./src/index.js"), &options);
        assert_eq!(
            injected,
            Entry::list([
                "/@reheat/runtime",
                "./overlay?options&sockHost=localhost",
                "./src/index.js",
            ])
        );
    }

    #[tokio::test]
    async fn test_dynamic_wrapper_injects_resolved_entry() {
        let entry = Entry::dynamic(|_| async { Ok(Entry::single("./lazy.js")) });
        let injected = inject(entry, &runtime_only());

        let Entry::Dynamic(factory) = injected else {
            panic!("expected the wrapper to stay dynamic");
        };
        let resolved = factory(Vec::new()).await.unwrap();
        assert_eq!(
            resolved,
            inject(Entry::single("./lazy.js"), &runtime_only())
        );
    }

    #[tokio::test]
    async fn test_dynamic_wrapper_supports_deferred_factories() {
        let entry = Entry::dynamic(|_| async {
            tokio::task::yield_now().await;
            Ok(Entry::list(["./a.js", "./b.js"]))
        });
        let injected = inject(entry, &runtime_only());

        let resolved = injected.resolve(Vec::new()).await.unwrap();
        assert_eq!(
            resolved,
            Entry::list(["/@reheat/runtime", "./a.js", "./b.js"])
        );
    }

    #[tokio::test]
    async fn test_dynamic_wrapper_forwards_args_unchanged() {
        let seen: Arc<Mutex<Option<FactoryArgs>>> = Arc::new(Mutex::new(None));
        let capture = Arc::clone(&seen);
        let entry = Entry::dynamic(move |args| {
            let capture = Arc::clone(&capture);
            async move {
                *capture.lock().unwrap() = Some(args);
                Ok(Entry::single("./a.js"))
            }
        });

        let injected = inject(entry, &runtime_only());
        let args = vec![json!({"mode": "development"}), json!("compiler")];
        injected.resolve(args.clone()).await.unwrap();

        assert_eq!(seen.lock().unwrap().as_ref(), Some(&args));
    }

    #[tokio::test]
    async fn test_dynamic_wrapper_passes_factory_errors_through() {
        let entry = Entry::dynamic(|_| async {
            Err::<Entry, FactoryError>(std::io::Error::other("socket exploded").into())
        });
        let injected = inject(entry, &runtime_only());

        let err = injected.resolve(Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "socket exploded");
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[tokio::test]
    async fn test_dynamic_resolving_to_dynamic_wraps_again() {
        let entry = Entry::dynamic(|_| async {
            Ok(Entry::dynamic(|_| async { Ok(Entry::single("./deep.js")) }))
        });
        let injected = inject(entry, &runtime_only());

        let inner = injected.resolve(Vec::new()).await.unwrap();
        let resolved = inner.resolve(Vec::new()).await.unwrap();
        assert_eq!(resolved, Entry::list(["/@reheat/runtime", "./deep.js"]));
    }

    #[test]
    fn test_inject_value_string_entry() {
        let injected = inject_value(&json!("./src/index.js"), &runtime_only()).unwrap();
        assert_eq!(injected, json!(["/@reheat/runtime", "./src/index.js"]));
    }

    #[test]
    fn test_inject_value_named_entry_keeps_key_order() {
        let injected = inject_value(
            &json!({"app": "./a.js", "admin": "./b.js"}),
            &runtime_only(),
        )
        .unwrap();
        assert_eq!(
            injected,
            json!({
                "app": ["/@reheat/runtime", "./a.js"],
                "admin": ["/@reheat/runtime", "./b.js"],
            })
        );
    }

    #[test]
    fn test_inject_value_rejects_unrecognized_shape() {
        let err = inject_value(&json!(42), &runtime_only()).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedEntry { .. }));
    }
}
