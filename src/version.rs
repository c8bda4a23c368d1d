const fn build_version_or_crate(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Release builds stamp `CONFIG_EMAIL_BUILD_VERSION`; local builds fall back to the crate version.
pub const VERSION: &str = build_version_or_crate(option_env!("CONFIG_EMAIL_BUILD_VERSION"));
