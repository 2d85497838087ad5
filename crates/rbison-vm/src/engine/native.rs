//! Engines compiled from bison and flex output.
//!
//! The module exports `rb_engine_signature` and `rb_parse`, and calls back
//! into the session through an `rb_host` table. The callbacks below are
//! the only place raw pointers from the engine are touched.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;
use std::slice;
use std::sync::{Mutex, PoisonError};

use libloading::{Library, Symbol};
use rbison_core::EngineArtifact;

use super::adapter::{EngineAdapter, EngineExit};
use super::arena::ValueHandle;
use super::error::{EngineError, ParseError};
use super::session::{Reduction, Session};

const SIGNATURE_SYMBOL: &str = "rb_engine_signature";
const PARSE_SYMBOL: &str = "rb_parse";

/// Generated parsers keep their state in globals.
static NATIVE_RUNS: Mutex<()> = Mutex::new(());

type SignatureFn = unsafe extern "C" fn() -> *const c_char;
type ParseFn = unsafe extern "C" fn(*mut RbHost, c_int) -> c_int;

/// Mirror of `rb_host` in `rbison.h`.
#[repr(C)]
struct RbHost {
    ctx: *mut c_void,
    read: unsafe extern "C" fn(*mut c_void, *mut c_char, c_int) -> c_int,
    token: unsafe extern "C" fn(*mut c_void, *const c_char, c_int) -> *mut c_void,
    reduce: unsafe extern "C" fn(
        *mut c_void,
        *const c_char,
        c_int,
        c_int,
        *const *const c_char,
        *const *mut c_void,
        *mut *mut c_void,
    ) -> c_int,
    error: unsafe extern "C" fn(*mut c_void, c_int, *const c_char, *const c_char),
}

/// A loaded engine module.
#[derive(Debug)]
pub struct NativeEngine {
    library: Library,
    path: PathBuf,
}

impl NativeEngine {
    /// Load `artifact` and check that it was built for its signature.
    pub fn load(artifact: &EngineArtifact) -> Result<Self, EngineError> {
        let path = artifact.path().to_path_buf();
        // SAFETY: engine modules have no load-time initializers beyond libc's.
        let library = unsafe { Library::new(&path) }.map_err(|e| EngineError::Load {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let engine = Self { library, path };

        let found = engine.signature()?;
        if found != artifact.signature().as_str() {
            return Err(EngineError::SignatureMismatch {
                path: engine.path,
                expected: artifact.signature().to_string(),
                found,
            });
        }
        engine.symbol::<ParseFn>(PARSE_SYMBOL)?;
        log::debug!("loaded engine {}", engine.path.display());
        Ok(engine)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Signature embedded in the module.
    pub fn signature(&self) -> Result<String, EngineError> {
        let signature = self.symbol::<SignatureFn>(SIGNATURE_SYMBOL)?;
        // SAFETY: returns a pointer to a static NUL-terminated string.
        let raw = unsafe { signature() };
        if raw.is_null() {
            return Ok(String::new());
        }
        // SAFETY: checked non-null above; the string is static.
        Ok(unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned())
    }

    fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>, EngineError> {
        // SAFETY: `T` matches the C declaration emitted with the grammar.
        unsafe { self.library.get::<T>(name.as_bytes()) }.map_err(|_| {
            EngineError::MissingSymbol {
                path: self.path.clone(),
                symbol: name,
            }
        })
    }
}

impl EngineAdapter for NativeEngine {
    fn run(&mut self, session: &mut Session<'_>, debug: bool) -> Result<EngineExit, EngineError> {
        let parse = self.symbol::<ParseFn>(PARSE_SYMBOL)?;
        let _serial = NATIVE_RUNS.lock().unwrap_or_else(PoisonError::into_inner);

        let mut host = RbHost {
            ctx: ptr::from_mut(session).cast::<c_void>(),
            read: host_read,
            token: host_token,
            reduce: host_reduce,
            error: host_error,
        };
        // SAFETY: `host` and the session outlive the call; the engine only
        // uses them until `rb_parse` returns.
        let status = unsafe { parse(&mut host, c_int::from(debug)) };

        Ok(match status {
            0 => EngineExit::Accepted,
            1 if !session.is_halted() => EngineExit::Rejected,
            _ => EngineExit::Aborted,
        })
    }
}

/// # Safety
/// `ctx` must be the session registered in `rb_parse`.
unsafe fn session<'s>(ctx: *mut c_void) -> &'s mut Session<'s> {
    // SAFETY: upheld by the caller.
    unsafe { &mut *ctx.cast::<Session<'s>>() }
}

fn internal_panic(session: &mut Session<'_>, callback: &str) {
    session.halt(ParseError::Input {
        message: format!("panic in {callback} callback"),
    });
}

unsafe extern "C" fn host_read(ctx: *mut c_void, buf: *mut c_char, max: c_int) -> c_int {
    // SAFETY: called by the engine with the registered context.
    let session = unsafe { session(ctx) };
    let max = usize::try_from(max).unwrap_or(0);
    let Ok(chunk) = panic::catch_unwind(AssertUnwindSafe(|| session.read(max))) else {
        internal_panic(session, "read");
        return 0;
    };
    // SAFETY: `buf` holds `max` bytes and the chunk is never longer.
    unsafe { ptr::copy_nonoverlapping(chunk.as_ptr(), buf.cast::<u8>(), chunk.len()) };
    c_int::try_from(chunk.len()).unwrap_or(0)
}

unsafe extern "C" fn host_token(ctx: *mut c_void, text: *const c_char, len: c_int) -> *mut c_void {
    // SAFETY: called by the engine with the registered context.
    let session = unsafe { session(ctx) };
    let len = usize::try_from(len).unwrap_or(0);
    let bytes = if text.is_null() || len == 0 {
        &[][..]
    } else {
        // SAFETY: `yytext` holds `yyleng` bytes.
        unsafe { slice::from_raw_parts(text.cast::<u8>(), len) }
    };
    let handle = session.token(bytes);
    ptr::without_provenance_mut(handle.to_raw())
}

unsafe extern "C" fn host_reduce(
    ctx: *mut c_void,
    target: *const c_char,
    option: c_int,
    nargs: c_int,
    names: *const *const c_char,
    values: *const *mut c_void,
    out: *mut *mut c_void,
) -> c_int {
    // SAFETY: called by the engine with the registered context.
    let session = unsafe { session(ctx) };
    // SAFETY: the generated actions pass static NUL-terminated strings.
    let target = unsafe { CStr::from_ptr(target) }.to_string_lossy();
    let option = usize::try_from(option).unwrap_or(0);
    let count = usize::try_from(nargs).unwrap_or(0);

    let mut symbols = Vec::with_capacity(count);
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        // SAFETY: both arrays have `nargs` entries when `nargs` > 0.
        let (name, value) = unsafe { (*names.add(i), *values.add(i)) };
        // SAFETY: as for `target`.
        symbols.push(unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned());
        handles.push(ValueHandle::from_raw(value.addr()));
    }

    let reduction = panic::catch_unwind(AssertUnwindSafe(|| {
        session.reduce(&target, option, symbols, &handles)
    }));
    match reduction {
        Ok(Reduction::Value(handle)) => {
            // SAFETY: `out` points at the action's `$$`.
            unsafe { *out = ptr::without_provenance_mut(handle.to_raw()) };
            0
        }
        Ok(Reduction::Failed) => 1,
        Ok(Reduction::Abort) => 2,
        Err(_) => {
            internal_panic(session, "reduce");
            2
        }
    }
}

unsafe extern "C" fn host_error(
    ctx: *mut c_void,
    line: c_int,
    message: *const c_char,
    near: *const c_char,
) {
    // SAFETY: called by the engine with the registered context.
    let session = unsafe { session(ctx) };
    let text = |raw: *const c_char| {
        if raw.is_null() {
            String::new()
        } else {
            // SAFETY: bison's message and `yytext` are NUL-terminated.
            unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
        }
    };
    let line = usize::try_from(line).unwrap_or(0);
    session.syntax_error(line, &text(message), &text(near));
}
