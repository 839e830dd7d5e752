// Version information for mako-config

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("v{}", VERSION)
}

pub fn full_version_info() -> String {
    format!("makocfg {}", version_string())
}
