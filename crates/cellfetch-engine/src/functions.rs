//! Host function surface
//!
//! Registers the engine's operations by symbolic name (e.g.
//! "fetch.sessionPerform", "text.substr") into a `HostFunctionRegistry`.
//! Handlers decode `CellValue` arguments, call into the engine, and
//! convert every failure into `CallResult::Error` with the function name
//! prefixed; errors cross the boundary as values, never as panics.

use std::sync::Arc;

use cellfetch_sdk::{CallResult, CellValue, CompletionQueue, HostFunctionRegistry};

use crate::engine::Engine;
use crate::handles::Handle;

fn arg_handle(args: &[CellValue], idx: usize) -> Result<Handle, String> {
    args.get(idx)
        .and_then(|v| v.as_handle())
        .map(Handle::from_u64)
        .ok_or_else(|| format!("argument {} must be a handle", idx + 1))
}

fn arg_text<'a>(args: &'a [CellValue], idx: usize) -> Result<&'a str, String> {
    args.get(idx)
        .and_then(|v| v.as_text())
        .ok_or_else(|| format!("argument {} must be text", idx + 1))
}

fn arg_index(args: &[CellValue], idx: usize) -> Result<usize, String> {
    let n = args
        .get(idx)
        .and_then(|v| v.as_number())
        .ok_or_else(|| format!("argument {} must be a number", idx + 1))?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(format!("argument {} must be a non-negative integer", idx + 1));
    }
    Ok(n as usize)
}

/// Register the full operation surface into `registry`.
///
/// `completions` receives one completion per asynchronous submission; the
/// host drains it on its own thread.
pub fn register_all(
    registry: &mut HostFunctionRegistry,
    engine: Arc<Engine>,
    completions: Arc<CompletionQueue>,
) {
    register_fetch(registry, engine.clone(), completions);
    register_text(registry, engine);
}

fn register_fetch(
    registry: &mut HostFunctionRegistry,
    engine: Arc<Engine>,
    completions: Arc<CompletionQueue>,
) {
    let e = engine.clone();
    registry.register("fetch.versionInfo", move |_args| {
        let mut rows = Vec::new();
        for (key, value) in e.version_info() {
            rows.push(key.to_string());
            rows.push(value);
        }
        CallResult::text(rows.join("\n"))
    });

    let e = engine.clone();
    registry.register("fetch.sessionCreate", move |args| {
        let url = args.first().and_then(|v| v.as_text());
        match e.session_create(url) {
            Ok(h) => CallResult::handle(h.as_u64()),
            Err(err) => CallResult::Error(format!("fetch.sessionCreate: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("fetch.sessionSetOption", move |args| {
        let result = arg_handle(args, 0).and_then(|h| {
            let key = arg_text(args, 1)?;
            let value = arg_text(args, 2)?;
            e.session_set_option(h, key, value).map_err(|e| e.to_string())
        });
        match result {
            Ok(()) => CallResult::empty(),
            Err(err) => CallResult::Error(format!("fetch.sessionSetOption: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("fetch.sessionPerform", move |args| {
        let result = arg_handle(args, 0)
            .and_then(|h| e.session_perform(h).map_err(|e| e.to_string()));
        match result {
            Ok(bytes) => CallResult::text(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => CallResult::Error(format!("fetch.sessionPerform: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("fetch.sessionPerformAsync", move |args| {
        let result = arg_handle(args, 0).and_then(|session| {
            let output = arg_handle(args, 1)?;
            e.perform_async(session, output, completions.token())
                .map_err(|e| e.to_string())
        });
        match result {
            Ok(()) => CallResult::empty(),
            Err(err) => CallResult::Error(format!("fetch.sessionPerformAsync: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("fetch.sessionReset", move |args| {
        let result =
            arg_handle(args, 0).and_then(|h| e.session_reset(h).map_err(|e| e.to_string()));
        match result {
            Ok(()) => CallResult::empty(),
            Err(err) => CallResult::Error(format!("fetch.sessionReset: {}", err)),
        }
    });

    let e = engine;
    registry.register("fetch.sessionRelease", move |args| {
        let result =
            arg_handle(args, 0).and_then(|h| e.session_release(h).map_err(|e| e.to_string()));
        match result {
            Ok(()) => CallResult::empty(),
            Err(err) => CallResult::Error(format!("fetch.sessionRelease: {}", err)),
        }
    });
}

fn register_text(registry: &mut HostFunctionRegistry, engine: Arc<Engine>) {
    let e = engine.clone();
    registry.register("text.create", move |args| {
        let initial = args.first().and_then(|v| v.as_text()).unwrap_or("");
        match e.text_create(initial) {
            Ok(h) => CallResult::handle(h.as_u64()),
            Err(err) => CallResult::Error(format!("text.create: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("text.append", move |args| {
        let result = arg_handle(args, 0).and_then(|h| {
            let s = arg_text(args, 1)?;
            e.text_append(h, s).map_err(|e| e.to_string())?;
            Ok(h)
        });
        match result {
            Ok(h) => CallResult::handle(h.as_u64()),
            Err(err) => CallResult::Error(format!("text.append: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("text.substr", move |args| {
        let result = arg_handle(args, 0).and_then(|h| {
            let pos = arg_index(args, 1)?;
            let count = arg_index(args, 2)?;
            e.text_substring(h, pos, count).map_err(|e| e.to_string())
        });
        match result {
            Ok(s) => CallResult::text(s),
            Err(err) => CallResult::Error(format!("text.substr: {}", err)),
        }
    });

    let e = engine.clone();
    registry.register("text.length", move |args| {
        let result =
            arg_handle(args, 0).and_then(|h| e.text_len(h).map_err(|e| e.to_string()));
        match result {
            Ok(len) => CallResult::number(len as f64),
            Err(err) => CallResult::Error(format!("text.length: {}", err)),
        }
    });

    let e = engine;
    registry.register("text.release", move |args| {
        let result =
            arg_handle(args, 0).and_then(|h| e.text_release(h).map_err(|e| e.to_string()));
        match result {
            Ok(()) => CallResult::empty(),
            Err(err) => CallResult::Error(format!("text.release: {}", err)),
        }
    });
}
