mod callback;
mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::{c_char, c_void};

use gw_device::{reciprocal, ArgCursor, DispatchGrid, Range3};
use gw_schedule::{schedule, DispatchPlan, DriverInfo, ProblemDims, TuningHint};

use crate::callback::CallbackSink;

/// Execute a closure that returns a `GWStatus`, catching any panics
/// and converting them into `GWStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> GWStatus + std::panic::UnwindSafe>(f: F) -> GWStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            GWStatus::ErrorInternal
        }
    }
}

/// Validated inputs shared by both scheduling entry points.
struct Launch<'a> {
    ctx: &'a GWContext,
    info: DriverInfo,
    hint: Option<TuningHint>,
    dims: ProblemDims,
    grid: DispatchGrid,
}

unsafe fn read_launch<'a>(
    ctx: *const GWContext,
    info: *const GWDriverInfo,
    hint: *const GWTuningHint,
    m: i32,
    n: i32,
    k: i32,
    range: *const GWDispatchRange,
) -> Result<Launch<'a>, GWStatus> {
    if ctx.is_null() || info.is_null() || range.is_null() {
        set_last_error("null argument".to_string());
        return Err(GWStatus::ErrorInvalidArgument);
    }
    if m < 0 || n < 0 || k < 0 {
        set_last_error(format!("negative problem size m={} n={} k={}", m, n, k));
        return Err(GWStatus::ErrorInvalidArgument);
    }

    let info = DriverInfo::from(&*info);
    if let Err(e) = info.validate() {
        set_last_error(e.to_string());
        return Err(GWStatus::ErrorInvalidArgument);
    }

    let range = &*range;
    let grid = match DispatchGrid::new(Range3::from(range.global), Range3::from(range.local)) {
        Ok(g) => g,
        Err(e) => {
            set_last_error(format!("invalid range: {}", e));
            return Err(GWStatus::ErrorInvalidArgument);
        }
    };

    Ok(Launch {
        ctx: &*ctx,
        info,
        hint: hint.as_ref().map(TuningHint::from),
        dims: ProblemDims::new(m, n, k),
        grid,
    })
}

fn write_range(range: &mut GWDispatchRange, grid: &DispatchGrid) {
    range.global = *grid.global.dims();
    range.local = *grid.local.dims();
}

/// Create a scheduling context for one device.
///
/// On success, writes a heap-allocated `GWContext` pointer into `*ctx_out`
/// and returns `GWStatus::Ok`. The caller must later call `gw_context_destroy`
/// to free the context.
#[no_mangle]
pub unsafe extern "C" fn gw_context_create(
    query: *const GWDeviceQuery,
    ctx_out: *mut *mut GWContext,
) -> GWStatus {
    catch_panic(|| {
        if query.is_null() || ctx_out.is_null() {
            set_last_error("null argument".to_string());
            return GWStatus::ErrorInvalidArgument;
        }
        let query = unsafe { &*query };
        match GWContext::new(query) {
            Ok(ctx) => {
                unsafe {
                    *ctx_out = Box::into_raw(Box::new(ctx));
                }
                GWStatus::Ok
            }
            Err(e) => {
                set_last_error(e.to_string());
                GWStatus::ErrorInvalidArgument
            }
        }
    })
}

/// Destroy a context previously created by `gw_context_create`.
///
/// Passing a null pointer is a no-op and returns `GWStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn gw_context_destroy(ctx: *mut GWContext) -> GWStatus {
    if ctx.is_null() {
        return GWStatus::Ok;
    }
    drop(Box::from_raw(ctx));
    GWStatus::Ok
}

/// Compute the scheduling arguments for one launch into a caller buffer.
///
/// `hint` may be null. On success the first `*args_len_out` entries of
/// `args_out` hold the arguments to append after the kernel's own, and
/// `range` holds the revised launch range. If the block needs more than
/// `args_capacity` entries, `*args_len_out` receives the required count,
/// `range` is left untouched and `GWStatus::ErrorBufferTooSmall` is returned.
#[no_mangle]
pub unsafe extern "C" fn gw_schedule(
    ctx: *const GWContext,
    info: *const GWDriverInfo,
    hint: *const GWTuningHint,
    m: i32,
    n: i32,
    k: i32,
    disable_hilbert: bool,
    range: *mut GWDispatchRange,
    args_out: *mut GWKernelArg,
    args_capacity: usize,
    args_len_out: *mut usize,
) -> GWStatus {
    catch_panic(|| {
        if args_len_out.is_null() || (args_out.is_null() && args_capacity > 0) {
            set_last_error("null argument".to_string());
            return GWStatus::ErrorInvalidArgument;
        }
        let launch = match unsafe { read_launch(ctx, info, hint, m, n, k, range) } {
            Ok(l) => l,
            Err(status) => return status,
        };

        let plan = DispatchPlan::compute(
            launch.grid,
            launch.dims,
            disable_hilbert,
            &launch.info,
            launch.hint.as_ref(),
            &launch.ctx.caps,
        );

        unsafe { *args_len_out = plan.args.len() };
        if plan.args.len() > args_capacity {
            set_last_error(format!(
                "{} scheduling arguments do not fit in a buffer of {}",
                plan.args.len(),
                args_capacity
            ));
            return GWStatus::ErrorBufferTooSmall;
        }

        if !plan.args.is_empty() {
            let out = unsafe { std::slice::from_raw_parts_mut(args_out, plan.args.len()) };
            for (slot, arg) in out.iter_mut().zip(&plan.args) {
                *slot = GWKernelArg::from(*arg);
            }
        }
        write_range(unsafe { &mut *range }, &plan.grid);
        GWStatus::Ok
    })
}

/// Compute the scheduling arguments for one launch, handing each one to
/// `callback` with its absolute index starting at `first_index`.
///
/// `hint` may be null. `range` is updated in place once every argument has
/// been delivered.
#[no_mangle]
pub unsafe extern "C" fn gw_schedule_with_callback(
    ctx: *const GWContext,
    info: *const GWDriverInfo,
    hint: *const GWTuningHint,
    m: i32,
    n: i32,
    k: i32,
    disable_hilbert: bool,
    range: *mut GWDispatchRange,
    first_index: u32,
    callback: GWArgCallback,
    user_data: *mut c_void,
) -> GWStatus {
    catch_panic(|| {
        let callback = match callback {
            Some(cb) => cb,
            None => {
                set_last_error("callback is null".to_string());
                return GWStatus::ErrorInvalidArgument;
            }
        };
        let launch = match unsafe { read_launch(ctx, info, hint, m, n, k, range) } {
            Ok(l) => l,
            Err(status) => return status,
        };

        let mut grid = launch.grid;
        let mut position = first_index as usize;
        let sink = CallbackSink {
            callback,
            user_data,
        };
        schedule(
            &mut ArgCursor::new(sink, &mut position),
            &mut grid,
            launch.dims,
            disable_hilbert,
            &launch.info,
            launch.hint.as_ref(),
            &launch.ctx.caps,
        );

        write_range(unsafe { &mut *range }, &grid);
        GWStatus::Ok
    })
}

/// Fixed-point reciprocal of `x` as the kernels consume it.
#[no_mangle]
pub extern "C" fn gw_reciprocal(x: u32) -> u32 {
    reciprocal(x)
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `gw_free_string`.
#[no_mangle]
pub extern "C" fn gw_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `gw_last_error`.
#[no_mangle]
pub unsafe extern "C" fn gw_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
