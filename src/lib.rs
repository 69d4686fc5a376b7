//! Function entry/exit tracing for nginx builds made with `-finstrument-functions`.
//!
//! Link the archive into nginx as the `ngx_http_ptrace` module and every instrumented function
//! prints `nginx: enter <addr>` / `nginx: exit <addr>` on stdout.
mod config;
mod console;
pub mod guard;
mod hooks;
mod line;
pub mod module;
mod tracer;

pub use config::{TraceConfig, DEFAULT_FD, DEFAULT_PREFIX};
pub use console::{Console, ConsoleError, Stdout};
pub use hooks::{__cyg_profile_func_enter, __cyg_profile_func_exit};
pub use line::{TraceLine, LINEFEED, NGX_MAX_ERROR_STR};
pub use tracer::{Addr, Event, Tracer};
