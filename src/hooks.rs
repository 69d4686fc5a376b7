//! `-finstrument-functions` entry points.
//!
//! GCC and Clang emit a call to these around the body of every function in a unit built
//! with `-finstrument-functions`. Rust code is never instrumented that way, so nothing here
//! needs a `no_instrument_function` marker. The guard inside [`Tracer`] stops
//! instrumented C reached from the output path (libc, an instrumented logger) from tracing
//! itself.

use crate::tracer::Tracer;
use crate::Stdout;
use core::ffi::c_void;

static TRACER: Tracer<Stdout> = Tracer::stdout();

/// Called on entry to every instrumented function.
#[no_mangle]
#[inline(never)]
pub extern "C" fn __cyg_profile_func_enter(this_fn: *mut c_void, call_site: *mut c_void) {
    TRACER.on_enter(this_fn as usize, call_site as usize);
}

/// Called just before every instrumented function returns.
#[no_mangle]
#[inline(never)]
pub extern "C" fn __cyg_profile_func_exit(this_fn: *mut c_void, call_site: *mut c_void) {
    TRACER.on_exit(this_fn as usize, call_site as usize);
}
