//! Instrumentation markers
//!
//! `profile_scope!` opens a [`crate::timer::ScopeTimer`] bound to the rest
//! of the enclosing block; `profile_function!` does the same with the
//! enclosing function's path as the label. Both take an optional session
//! argument and default to [`crate::TraceSession::global`].
//!
//! With the `instrument` feature disabled (it is on by default) every
//! invocation expands to nothing, so instrumented builds can be shipped
//! with tracing compiled out entirely.

/// Time the remainder of the enclosing scope.
///
/// ```no_run
/// # fn load_assets() {}
/// fn startup() {
///     scope_trace::profile_scope!("startup::load");
///     load_assets();
/// } // region ends here
/// ```
#[cfg(feature = "instrument")]
#[macro_export]
macro_rules! profile_scope {
    ($session:expr, $label:expr) => {
        let _profile_guard = $crate::timer::ScopeTimer::start($session, $label);
    };
    ($label:expr) => {
        let _profile_guard = $crate::timer::ScopeTimer::attach($label);
    };
}

#[cfg(not(feature = "instrument"))]
#[macro_export]
macro_rules! profile_scope {
    ($session:expr, $label:expr) => {};
    ($label:expr) => {};
}

/// Time the remainder of the enclosing function, labeled with its path.
#[macro_export]
macro_rules! profile_function {
    ($session:expr) => {
        $crate::profile_scope!($session, $crate::__function_path!());
    };
    () => {
        $crate::profile_scope!($crate::__function_path!());
    };
}

/// Path of the enclosing function, via the type name of a nested marker fn.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn __marker() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__marker);
        &name[..name.len() - "::__marker".len()]
    }};
}
