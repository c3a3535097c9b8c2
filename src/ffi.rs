//! C ABI, see `include/crystalline.h`.
//!
//! Every entry point returns `1` for success/allowed and `0` for
//! failure/forbidden. Panics never cross the boundary.

use crate::core::deontic::ActionStatus;
use crate::core::kernel::Kernel;
use crate::utils::logger;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

static KERNEL: OnceLock<Kernel> = OnceLock::new();

fn kernel() -> &'static Kernel {
    KERNEL.get_or_init(Kernel::default_policy)
}

/// Borrows a NUL-terminated UTF-8 string from C.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the call.
unsafe fn borrow_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn guarded<F: FnOnce() -> bool>(f: F) -> i32 {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(_) => {
            tracing::error!("Panic caught at the C boundary");
            0
        }
    }
}

/// Initialise the kernel with the default policy. Idempotent.
#[no_mangle]
pub extern "C" fn crystalline_init() -> i32 {
    guarded(|| {
        if logger::try_init_library_logger() {
            tracing::debug!("Library logger installed");
        }
        let kernel = kernel();
        tracing::info!("Crystalline kernel {} ready", kernel.version);
        true
    })
}

/// Returns 1 if `payload` is compliant (Allowed), 0 if Forbidden or invalid.
///
/// # Safety
/// `payload` must be null or a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn crystalline_check_compliance(payload: *const c_char) -> i32 {
    let Some(payload) = borrow_c_str(payload) else {
        return 0;
    };
    guarded(|| kernel().check_compliance(payload) == ActionStatus::Allowed)
}

/// Returns 1 if `label` names a valid secure partition, 0 otherwise.
///
/// # Safety
/// `label` must be null or a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn crystalline_verify_partition(label: *const c_char) -> i32 {
    let Some(label) = borrow_c_str(label) else {
        return 0;
    };
    guarded(|| kernel().verify_partition(label))
}
