//! Embedded client-side runtime modules.
//!
//! These are the sources served for the virtual specifiers the plugin
//! injects. The live-update runtime must evaluate before any user module
//! (it installs the global refresh hook at import time), and the legacy
//! socket shim must evaluate before the runtime so the runtime attaches to
//! the shim's transport instead of opening its own.

/// The live-update client runtime.
///
/// Installs the refresh hook, opens the update socket (or adopts the
/// legacy shim's transport when present), and applies incremental updates
/// by re-importing changed modules, falling back to a full reload.
pub const REFRESH_RUNTIME_JS: &str = r#"
// reheat live-update runtime
const registry = new Map();

function installGlobalHook() {
  if (window.__reheat_hook__) return;
  window.__reheat_hook__ = {
    register(id, accept) {
      registry.set(id, accept);
    },
    unregister(id) {
      registry.delete(id);
    },
  };
}

// The hook must exist before any user module evaluates.
installGlobalHook();

function openTransport() {
  // Adopt the legacy shim's transport when it loaded first.
  if (window.__reheat_socket__) return window.__reheat_socket__;

  const socket = new WebSocket(`ws://${location.host}/__reheat`);
  const listeners = [];
  socket.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    listeners.forEach((cb) => cb(msg));
  };
  socket.onclose = () => {
    console.log('[reheat] connection lost, reloading once the server is back');
    setTimeout(() => location.reload(), 1000);
  };
  return {
    subscribe(cb) {
      listeners.push(cb);
    },
  };
}

async function applyUpdate(update) {
  const accept = registry.get(update.id);
  if (!accept) {
    location.reload();
    return;
  }
  try {
    const next = await import(update.url + '?t=' + update.timestamp);
    accept(next);
    console.log(`[reheat] updated: ${update.id}`);
  } catch (err) {
    console.error(`[reheat] update failed for ${update.id}:`, err);
    location.reload();
  }
}

const transport = openTransport();
transport.subscribe((msg) => {
  if (msg.type === 'update') {
    msg.updates.forEach(applyUpdate);
  } else if (msg.type === 'reload') {
    location.reload();
  }
});
"#;

/// The legacy socket transport shim.
///
/// Exposes the dev server's long-lived compatibility endpoint under the
/// same `subscribe` surface the runtime expects, so older server setups
/// keep delivering update notifications.
pub const LEGACY_SOCKET_SHIM_JS: &str = r#"
// reheat legacy socket shim
(function () {
  if (window.__reheat_socket__) return;

  const listeners = [];
  const socket = new WebSocket(`ws://${location.host}/sockjs-node`);
  socket.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    listeners.forEach((cb) => cb(msg));
  };

  window.__reheat_socket__ = {
    subscribe(cb) {
      listeners.push(cb);
    },
  };
})();
"#;

/// The error overlay client.
///
/// Reads its socket parameters from the query string appended to its own
/// specifier (`?options&sockHost=..&sockPort=..&sockPath=..`), subscribes
/// to the update transport, and renders build and runtime errors in a
/// fixed overlay.
pub const OVERLAY_CLIENT_JS: &str = r#"
// reheat error overlay
const params = new URL(import.meta.url).searchParams;
const sockHost = params.get('sockHost') || location.hostname;
const sockPort = params.get('sockPort') || location.port;
const sockPath = params.get('sockPath') || '/__reheat';

function transport() {
  if (window.__reheat_socket__) return window.__reheat_socket__;

  const listeners = [];
  const socket = new WebSocket(`ws://${sockHost}:${sockPort}${sockPath}`);
  socket.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    listeners.forEach((cb) => cb(msg));
  };
  return {
    subscribe(cb) {
      listeners.push(cb);
    },
  };
}

function show(message) {
  let overlay = document.getElementById('__reheat_overlay');
  if (!overlay) {
    overlay = document.createElement('div');
    overlay.id = '__reheat_overlay';
    overlay.style.cssText = `
      position: fixed; top: 0; left: 0; right: 0; bottom: 0;
      background: rgba(0,0,0,0.9); color: #ff5555;
      padding: 32px; font-family: monospace; font-size: 16px;
      white-space: pre-wrap; overflow: auto; z-index: 999999;
    `;
    document.body.appendChild(overlay);
  }
  overlay.textContent = 'Build Error:\n\n' + message;
  overlay.style.display = 'block';
}

function hide() {
  const overlay = document.getElementById('__reheat_overlay');
  if (overlay) overlay.style.display = 'none';
}

transport().subscribe((msg) => {
  if (msg.type === 'error') {
    show(msg.message);
  } else if (msg.type === 'update' || msg.type === 'reload') {
    hide();
  }
});
"#;
