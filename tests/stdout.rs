//! Kept in its own test binary: it points fd 1 at a pipe, which would swallow the output of
//! any test running alongside it.

use core::ffi::{c_int, c_void};
use core::ptr::null_mut;
use ngx_ptrace::{__cyg_profile_func_enter, __cyg_profile_func_exit};

fn capture_stdout(f: impl FnOnce()) -> Vec<u8> {
    let mut fds = [0 as c_int; 2];
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
    let saved = unsafe { libc::dup(1) };
    assert!(saved >= 0);
    assert_eq!(unsafe { libc::dup2(fds[1], 1) }, 1);

    f();

    unsafe {
        libc::dup2(saved, 1);
        libc::close(saved);
        libc::close(fds[1]);
    }
    let mut out = Vec::new();
    let mut buf = [0u8; 256];
    loop {
        let n = unsafe { libc::read(fds[0], buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }
        out.extend_from_slice(&buf[..n as usize]);
    }
    unsafe { libc::close(fds[0]) };
    out
}

#[cfg(target_pointer_width = "64")]
#[test]
fn hooks_write_nginx_lines_to_stdout() {
    let out = capture_stdout(|| {
        __cyg_profile_func_enter(0x1000 as *mut c_void, null_mut());
        __cyg_profile_func_exit(0x1000 as *mut c_void, 0x2000 as *mut c_void);
    });
    assert_eq!(
        String::from_utf8_lossy(&out),
        "nginx: enter 0000000000001000\nnginx: exit 0000000000001000\n"
    );
}
