//! `reheat inject` — rewrite a bundler config's entry.
//!
//! Reads a JSON config from a file or stdin, prepends the refresh startup
//! modules to its entry, and prints the transformed JSON to stdout. The
//! input is either a full config object carrying an `"entry"` key (only
//! that field is rewritten) or a bare entry value.

use std::io::Read;
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use reheat_core::{inject_value, Error, OverlayEntry, OverlaySetting, RefreshOptions};
use reheat_plugin::virtual_runtime_modules;
use serde_json::Value;

/// Arguments for `reheat inject`.
#[derive(clap::Args, Debug)]
pub struct InjectArgs {
    /// Bundler config file (JSON); reads stdin when omitted
    pub config: Option<PathBuf>,

    /// Prepend the legacy socket shim
    #[arg(long)]
    pub legacy_socket: bool,

    /// Socket host forwarded to the overlay client
    #[arg(long, value_name = "HOST")]
    pub socket_host: Option<String>,

    /// Socket port forwarded to the overlay client
    #[arg(long, value_name = "PORT")]
    pub socket_port: Option<u16>,

    /// Socket endpoint path forwarded to the overlay client
    #[arg(long, value_name = "PATH")]
    pub socket_path: Option<String>,

    /// Enable the built-in error overlay
    #[arg(long)]
    pub overlay: bool,

    /// Use a custom overlay entry module instead of the built-in one
    #[arg(long, value_name = "MODULE", conflicts_with = "overlay")]
    pub overlay_entry: Option<String>,

    /// Override the live-update runtime specifier
    #[arg(long, value_name = "MODULE")]
    pub runtime: Option<String>,

    /// Override the legacy socket shim specifier
    #[arg(long, value_name = "MODULE")]
    pub socket_shim: Option<String>,
}

pub fn run(args: &InjectArgs) -> Result<()> {
    let (path, source) = read_config(args.config.as_deref()).into_diagnostic()?;
    let config: Value = serde_json::from_str(&source)
        .map_err(|source| Error::ConfigParse {
            path: path.clone(),
            source,
        })
        .into_diagnostic()?;

    let options = RefreshOptions {
        use_legacy_socket: args.legacy_socket,
        socket_host: args.socket_host.clone(),
        socket_port: args.socket_port,
        socket_path: args.socket_path.clone(),
        overlay: match &args.overlay_entry {
            Some(entry) => OverlaySetting::Custom(OverlayEntry {
                entry: entry.clone(),
            }),
            None => OverlaySetting::Enabled(args.overlay),
        },
    };

    let mut modules = virtual_runtime_modules();
    if let Some(runtime) = &args.runtime {
        modules.refresh_runtime = runtime.clone();
    }
    if let Some(shim) = &args.socket_shim {
        modules.socket_shim = shim.clone();
    }
    let inject_options = options.normalize(&modules);
    tracing::debug!(config = %path.display(), modules = ?inject_options.injected_modules(), "injecting");

    let transformed = match &config {
        // A full config object: rewrite the entry field, keep the rest.
        Value::Object(map) if map.contains_key("entry") => {
            let mut map = map.clone();
            let entry = inject_value(&map["entry"], &inject_options).into_diagnostic()?;
            map.insert("entry".to_string(), entry);
            Value::Object(map)
        }
        value => inject_value(value, &inject_options).into_diagnostic()?,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&transformed).into_diagnostic()?
    );
    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<(PathBuf, String), Error> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
            Ok((path.to_path_buf(), source))
        }
        None => {
            let path = PathBuf::from("<stdin>");
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| Error::ConfigRead {
                    path: path.clone(),
                    source,
                })?;
            Ok((path, source))
        }
    }
}
