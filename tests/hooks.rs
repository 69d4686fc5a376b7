use core::ffi::c_void;
use core::ptr::{addr_of, null_mut};
use ngx_ptrace::module::{ngx_http_ptrace, LifecycleHook, NGX_HTTP_MODULE, NGX_OK};
use ngx_ptrace::{__cyg_profile_func_enter, __cyg_profile_func_exit, guard};

#[test]
fn hooks_leave_guard_released() {
    assert!(!guard::is_held());
    __cyg_profile_func_enter(0x1000 as *mut c_void, null_mut());
    assert!(!guard::is_held());
    __cyg_profile_func_exit(0x1000 as *mut c_void, null_mut());
    assert!(!guard::is_held());
}

#[test]
fn hooks_under_held_guard_keep_it_held() {
    let entered = guard::try_enter().expect("guard free");
    __cyg_profile_func_enter(0x1000 as *mut c_void, 0x2000 as *mut c_void);
    __cyg_profile_func_exit(0x1000 as *mut c_void, 0x2000 as *mut c_void);
    assert!(guard::is_held());
    drop(entered);
    assert!(!guard::is_held());
}

#[test]
fn hooks_from_many_threads() {
    let handles: Vec<_> = (0..8usize)
        .map(|i| {
            std::thread::spawn(move || {
                for n in 0..16usize {
                    let addr = (i << 16 | n) as *mut c_void;
                    __cyg_profile_func_enter(addr, null_mut());
                    __cyg_profile_func_exit(addr, null_mut());
                }
                guard::is_held()
            })
        })
        .collect();
    for handle in handles {
        assert!(!handle.join().unwrap());
    }
}

#[test]
fn exported_descriptor_is_inert() {
    let module = unsafe { &*addr_of!(ngx_http_ptrace) };
    assert_eq!(module.type_, NGX_HTTP_MODULE);
    let absent: Vec<LifecycleHook> = module
        .lifecycle()
        .iter()
        .filter(|(_, present)| !present)
        .map(|(hook, _)| *hook)
        .collect();
    assert_eq!(absent.len(), 7);
    assert_eq!(absent[0], LifecycleHook::InitMaster);
    assert_eq!(unsafe { module.run_init(null_mut(), null_mut(), null_mut()) }, NGX_OK);
}
