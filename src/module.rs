//! The nginx module descriptor.
//!
//! `ngx_http_ptrace` is an HTTP module with no directives, no configuration callbacks and no
//! lifecycle hooks. Listing it in the host's module table is only a way to get this archive
//! linked into the nginx binary, which brings the instrumentation hooks with it.

use core::ffi::{c_char, c_void};
use core::ptr::{addr_of, null_mut};
use log::debug;

pub type NgxInt = isize;
pub type NgxUint = usize;

pub const NGX_OK: NgxInt = 0;
pub const NGX_ERROR: NgxInt = -1;
pub const NGX_MODULE_UNSET_INDEX: NgxUint = NgxUint::MAX;
/// `"HTTP"` as a little-endian tag.
pub const NGX_HTTP_MODULE: NgxUint = 0x5054_5448;
/// `nginx_version` of the host build.
pub const NGINX_VERSION: NgxUint = 1_026_002;
/// Build signature of the host; only checked when loaded with `load_module`.
pub const NGX_MODULE_SIGNATURE: &[u8] = b"8,4,8,0000111111010111001110111111000110\0";

#[repr(C)]
pub struct NgxConf {
    _private: [u8; 0],
}

#[repr(C)]
pub struct NgxCycle {
    _private: [u8; 0],
}

#[repr(C)]
pub struct NgxLog {
    _private: [u8; 0],
}

pub type ConfHandler = unsafe extern "C" fn(cf: *mut NgxConf) -> NgxInt;
pub type CreateConf = unsafe extern "C" fn(cf: *mut NgxConf) -> *mut c_void;
pub type InitConf = unsafe extern "C" fn(cf: *mut NgxConf, conf: *mut c_void) -> *mut c_char;
pub type MergeConf =
    unsafe extern "C" fn(cf: *mut NgxConf, prev: *mut c_void, conf: *mut c_void) -> *mut c_char;
pub type MasterHook = unsafe extern "C" fn(log: *mut NgxLog) -> NgxInt;
pub type CycleHook = unsafe extern "C" fn(cycle: *mut NgxCycle) -> NgxInt;
pub type ExitHook = unsafe extern "C" fn(cycle: *mut NgxCycle);

/// `ngx_http_module_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NgxHttpModule {
    pub preconfiguration: Option<ConfHandler>,
    pub postconfiguration: Option<ConfHandler>,
    pub create_main_conf: Option<CreateConf>,
    pub init_main_conf: Option<InitConf>,
    pub create_srv_conf: Option<CreateConf>,
    pub merge_srv_conf: Option<MergeConf>,
    pub create_loc_conf: Option<CreateConf>,
    pub merge_loc_conf: Option<MergeConf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfSlot {
    Preconfiguration,
    Postconfiguration,
    CreateMainConf,
    InitMainConf,
    CreateSrvConf,
    MergeSrvConf,
    CreateLocConf,
    MergeLocConf,
}

impl NgxHttpModule {
    pub const EMPTY: Self = Self {
        preconfiguration: None,
        postconfiguration: None,
        create_main_conf: None,
        init_main_conf: None,
        create_srv_conf: None,
        merge_srv_conf: None,
        create_loc_conf: None,
        merge_loc_conf: None,
    };

    /// Which configuration callbacks are provided.
    pub fn slots(&self) -> [(ConfSlot, bool); 8] {
        [
            (ConfSlot::Preconfiguration, self.preconfiguration.is_some()),
            (ConfSlot::Postconfiguration, self.postconfiguration.is_some()),
            (ConfSlot::CreateMainConf, self.create_main_conf.is_some()),
            (ConfSlot::InitMainConf, self.init_main_conf.is_some()),
            (ConfSlot::CreateSrvConf, self.create_srv_conf.is_some()),
            (ConfSlot::MergeSrvConf, self.merge_srv_conf.is_some()),
            (ConfSlot::CreateLocConf, self.create_loc_conf.is_some()),
            (ConfSlot::MergeLocConf, self.merge_loc_conf.is_some()),
        ]
    }
}

/// `ngx_module_t`
#[repr(C)]
#[derive(Debug)]
pub struct NgxModule {
    pub ctx_index: NgxUint,
    pub index: NgxUint,
    pub name: *mut c_char,
    pub spare0: NgxUint,
    pub spare1: NgxUint,
    pub version: NgxUint,
    pub signature: *const c_char,

    pub ctx: *mut c_void,
    pub commands: *mut c_void,
    pub type_: NgxUint,

    pub init_master: Option<MasterHook>,
    pub init_module: Option<CycleHook>,
    pub init_process: Option<CycleHook>,
    pub init_thread: Option<CycleHook>,
    pub exit_thread: Option<ExitHook>,
    pub exit_process: Option<ExitHook>,
    pub exit_master: Option<ExitHook>,

    pub spare_hook: [usize; 8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    InitMaster,
    InitModule,
    InitProcess,
    InitThread,
    ExitThread,
    ExitProcess,
    ExitMaster,
}

impl NgxModule {
    /// `NGX_MODULE_V1` header, the given context, no commands, no hooks,
    /// `NGX_MODULE_V1_PADDING`.
    pub const fn v1(ctx: *mut c_void, type_: NgxUint) -> Self {
        Self {
            ctx_index: NGX_MODULE_UNSET_INDEX,
            index: NGX_MODULE_UNSET_INDEX,
            name: null_mut(),
            spare0: 0,
            spare1: 0,
            version: NGINX_VERSION,
            signature: NGX_MODULE_SIGNATURE.as_ptr() as *const c_char,
            ctx,
            commands: null_mut(),
            type_,
            init_master: None,
            init_module: None,
            init_process: None,
            init_thread: None,
            exit_thread: None,
            exit_process: None,
            exit_master: None,
            spare_hook: [0; 8],
        }
    }

    /// Which lifecycle hooks are provided.
    pub fn lifecycle(&self) -> [(LifecycleHook, bool); 7] {
        [
            (LifecycleHook::InitMaster, self.init_master.is_some()),
            (LifecycleHook::InitModule, self.init_module.is_some()),
            (LifecycleHook::InitProcess, self.init_process.is_some()),
            (LifecycleHook::InitThread, self.init_thread.is_some()),
            (LifecycleHook::ExitThread, self.exit_thread.is_some()),
            (LifecycleHook::ExitProcess, self.exit_process.is_some()),
            (LifecycleHook::ExitMaster, self.exit_master.is_some()),
        ]
    }

    /// The HTTP context, if this is an HTTP module.
    ///
    /// # Safety
    /// `ctx` must point to a live `ngx_http_module_t` when `type_` is [`NGX_HTTP_MODULE`].
    pub unsafe fn http_ctx(&self) -> Option<&NgxHttpModule> {
        if self.type_ != NGX_HTTP_MODULE {
            return None;
        }
        (self.ctx as *const NgxHttpModule).as_ref()
    }

    /// Walk the descriptor the way the host does from startup to a running worker:
    /// `init_master`, the HTTP configuration slots in `ngx_http_block` order, then
    /// `init_module`, `init_process` and `init_thread`. Absent slots are skipped; the first
    /// failure stops the walk and is returned.
    ///
    /// # Safety
    /// `log`, `cf` and `cycle` are handed to the module's callbacks as is, and `ctx` must
    /// satisfy [`NgxModule::http_ctx`].
    pub unsafe fn run_init(
        &self,
        log: *mut NgxLog,
        cf: *mut NgxConf,
        cycle: *mut NgxCycle,
    ) -> NgxInt {
        match self.init_sequence(log, cf, cycle) {
            Ok(()) => NGX_OK,
            Err(rc) => rc,
        }
    }

    unsafe fn init_sequence(
        &self,
        log: *mut NgxLog,
        cf: *mut NgxConf,
        cycle: *mut NgxCycle,
    ) -> Result<(), NgxInt> {
        if let Some(init) = self.init_master {
            status("init_master", init(log))?;
        }
        if let Some(ctx) = self.http_ctx() {
            ctx.conf_sequence(cf)?;
        }
        for (name, hook) in [
            ("init_module", self.init_module),
            ("init_process", self.init_process),
            ("init_thread", self.init_thread),
        ] {
            match hook {
                Some(hook) => status(name, hook(cycle))?,
                None => debug!("{} not provided", name),
            }
        }
        Ok(())
    }
}

impl NgxHttpModule {
    // one server, one location: merges see the same conf as parent and child
    unsafe fn conf_sequence(&self, cf: *mut NgxConf) -> Result<(), NgxInt> {
        if let Some(pre) = self.preconfiguration {
            status("preconfiguration", pre(cf))?;
        }
        let main_conf = created("create_main_conf", self.create_main_conf, cf)?;
        let srv_conf = created("create_srv_conf", self.create_srv_conf, cf)?;
        let loc_conf = created("create_loc_conf", self.create_loc_conf, cf)?;
        if let Some(init) = self.init_main_conf {
            conf_ok("init_main_conf", init(cf, main_conf))?;
        }
        if let Some(merge) = self.merge_srv_conf {
            conf_ok("merge_srv_conf", merge(cf, srv_conf, srv_conf))?;
        }
        if let Some(merge) = self.merge_loc_conf {
            conf_ok("merge_loc_conf", merge(cf, loc_conf, loc_conf))?;
        }
        if let Some(post) = self.postconfiguration {
            status("postconfiguration", post(cf))?;
        }
        Ok(())
    }
}

fn status(name: &str, rc: NgxInt) -> Result<(), NgxInt> {
    if rc != NGX_OK {
        debug!("{} returned {}", name, rc);
        return Err(rc);
    }
    Ok(())
}

/// `NGX_CONF_OK` is a null string; anything else is an error message.
fn conf_ok(name: &str, rv: *mut c_char) -> Result<(), NgxInt> {
    if !rv.is_null() {
        debug!("{} failed", name);
        return Err(NGX_ERROR);
    }
    Ok(())
}

unsafe fn created(
    name: &str,
    slot: Option<CreateConf>,
    cf: *mut NgxConf,
) -> Result<*mut c_void, NgxInt> {
    let Some(create) = slot else {
        return Ok(null_mut());
    };
    let conf = create(cf);
    if conf.is_null() {
        debug!("{} returned NULL", name);
        return Err(NGX_ERROR);
    }
    Ok(conf)
}

#[allow(non_upper_case_globals)]
#[no_mangle]
pub static ngx_http_ptrace_ctx: NgxHttpModule = NgxHttpModule::EMPTY;

/// Written by the host at startup (`ctx_index`, `index`), hence `static mut`.
#[allow(non_upper_case_globals)]
#[no_mangle]
pub static mut ngx_http_ptrace: NgxModule = NgxModule::v1(
    addr_of!(ngx_http_ptrace_ctx) as *mut c_void,
    NGX_HTTP_MODULE,
);
