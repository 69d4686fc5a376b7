use crate::config::TraceConfig;
use crate::console::{Console, Stdout};
use crate::guard;
use crate::line::{TraceLine, NGX_MAX_ERROR_STR};
use core::fmt::{self, Display, Formatter, Write};
use core::mem::size_of;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Enter,
    Exit,
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Event::Enter => "enter",
            Event::Exit => "exit",
        })
    }
}

/// An address printed the way nginx prints `%p`: upper-case hex, zero padded to the
/// pointer width, no `0x`.
#[derive(Debug, Clone, Copy)]
pub struct Addr(pub usize);

impl Display for Addr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$X}", self.0, width = 2 * size_of::<usize>())
    }
}

pub struct Tracer<C> {
    console: C,
    config: TraceConfig,
}

impl<C> Tracer<C> {
    pub const fn new(console: C, config: TraceConfig) -> Self {
        Self { console, config }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }
}

impl Tracer<Stdout> {
    /// The tracer behind the instrumentation hooks.
    pub const fn stdout() -> Self {
        Self::from_config(TraceConfig::new())
    }

    pub const fn from_config(config: TraceConfig) -> Self {
        Self::new(Stdout::new(config.fd), config)
    }
}

impl<C: Console> Tracer<C> {
    /// Write one line: prefix, `args`, line feed.
    ///
    /// The line is built in a fixed [`NGX_MAX_ERROR_STR`] buffer and cut short if it
    /// does not fit. Console errors are dropped; this never fails. Takes the guard like
    /// the hooks do, so nothing is written if this thread is already emitting.
    pub fn emit(&self, args: fmt::Arguments<'_>) {
        let Some(_entered) = guard::try_enter() else {
            return;
        };
        self.write_line(args);
    }

    // caller holds the guard
    fn write_line(&self, args: fmt::Arguments<'_>) {
        let mut line = TraceLine::<NGX_MAX_ERROR_STR>::new();
        line.push_bytes(self.config.prefix.as_bytes());
        let _ = line.write_fmt(args);
        if line.is_truncated() {
            trace!("trace line truncated to {} bytes", NGX_MAX_ERROR_STR);
        }
        if let Err(err) = self.console.write(line.finish()) {
            trace!("{}", err);
        }
    }

    pub fn on_enter(&self, this_fn: usize, call_site: usize) {
        self.event(Event::Enter, this_fn, call_site);
    }

    pub fn on_exit(&self, this_fn: usize, call_site: usize) {
        self.event(Event::Exit, this_fn, call_site);
    }

    /// Run `f` between an enter and an exit event for `this_fn`, for code that is not
    /// compiled with instrumentation.
    pub fn traced<R>(&self, this_fn: usize, call_site: usize, f: impl FnOnce() -> R) -> R {
        self.on_enter(this_fn, call_site);
        let ret = f();
        self.on_exit(this_fn, call_site);
        ret
    }

    fn event(&self, event: Event, this_fn: usize, call_site: usize) {
        let Some(_entered) = guard::try_enter() else {
            return;
        };
        if self.config.call_site {
            self.write_line(format_args!(
                "{} {} from {}",
                event,
                Addr(this_fn),
                Addr(call_site)
            ));
        } else {
            self.write_line(format_args!("{} {}", event, Addr(this_fn)));
        }
    }
}
