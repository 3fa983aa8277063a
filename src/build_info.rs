//! Compile-time build information embedded by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `racer 0.1.0 (abc1234, 2026-01-31)`, logged at startup.
pub fn version_line() -> String {
    format!(
        "racer {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}
