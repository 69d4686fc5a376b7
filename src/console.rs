use core::ffi::c_int;
use core::fmt::{Display, Formatter};

/// Where finished trace lines go.
pub trait Console {
    /// Write the whole of `bytes` in one go.
    fn write(&self, bytes: &[u8]) -> Result<(), ConsoleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    Partial { written: usize, len: usize },
    Os(i32),
}

impl Display for ConsoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ConsoleError::Partial { written, len } => {
                write!(f, "short console write: {} of {} bytes", written, len)
            }
            ConsoleError::Os(errno) => write!(f, "console write failed: errno {}", errno),
        }
    }
}

/// A raw file descriptor, written with a single `write(2)`.
#[derive(Debug, Clone, Copy)]
pub struct Stdout {
    fd: c_int,
}

impl Stdout {
    pub const fn new(fd: c_int) -> Self {
        Self { fd }
    }

    pub fn fd(&self) -> c_int {
        self.fd
    }
}

impl Console for Stdout {
    fn write(&self, bytes: &[u8]) -> Result<(), ConsoleError> {
        let n = unsafe { libc::write(self.fd, bytes.as_ptr().cast(), bytes.len()) };
        if n < 0 {
            let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
            return Err(ConsoleError::Os(errno));
        }
        let written = n as usize;
        if written < bytes.len() {
            return Err(ConsoleError::Partial {
                written,
                len: bytes.len(),
            });
        }
        Ok(())
    }
}
