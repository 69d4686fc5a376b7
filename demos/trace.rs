use core::ffi::c_void;
use ngx_ptrace::{TraceConfig, Tracer};

static TRACER: Tracer<ngx_ptrace::Stdout> =
    Tracer::from_config(TraceConfig::new().with_prefix("demo: ").with_call_site(true));

fn main() {
    s1(1);
}

fn _add(a: usize, b: usize) -> usize {
    a + b
}

fn s1(a1: usize) -> usize {
    TRACER.traced(s1 as usize, main as usize, || {
        let x = _add(a1, 1);
        println!("{}", s2(x));
        0
    })
}

fn s2(a1: usize) -> usize {
    TRACER.traced(s2 as usize, s1 as usize, || {
        let x = _add(a1, 1);
        s3();
        x
    })
}

fn s3() {
    TRACER.traced(s3 as usize, s2 as usize, || {
        // what an instrumented C callee would produce
        let (this_fn, call_site) = (_add as usize as *mut c_void, s3 as usize as *mut c_void);
        ngx_ptrace::__cyg_profile_func_enter(this_fn, call_site);
        ngx_ptrace::__cyg_profile_func_exit(this_fn, call_site);
    });
}
