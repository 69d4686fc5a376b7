use core::ffi::c_int;

/// Prefix nginx puts in front of everything it writes to the console.
pub const DEFAULT_PREFIX: &str = "nginx: ";
/// stdout
pub const DEFAULT_FD: c_int = 1;

/// How a [`Tracer`](crate::Tracer) formats and where it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    pub prefix: &'static str,
    pub fd: c_int,
    /// Append ` from <call-site>` to every line.
    pub call_site: bool,
}

impl TraceConfig {
    pub const fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            fd: DEFAULT_FD,
            call_site: false,
        }
    }

    pub const fn with_prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub const fn with_fd(mut self, fd: c_int) -> Self {
        self.fd = fd;
        self
    }

    pub const fn with_call_site(mut self, call_site: bool) -> Self {
        self.call_site = call_site;
        self
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new()
    }
}
