//! Compile-time configuration for the admin panels.

use school_admin_shared::config::PanelConfig;

// API base URL - 编译时从环境变量读取，默认同源
pub const API_BASE: &str = match option_env!("SCHOOL_ADMIN_API_BASE") {
    Some(url) => url,
    None => "",
};

/// Panel settings from `SCHOOL_ADMIN_COMMIT_MODE`,
/// `SCHOOL_ADMIN_REQUEST_TIMEOUT_MS` and `SCHOOL_ADMIN_BATCH_CONCURRENCY`.
pub fn panel_config() -> PanelConfig {
    PanelConfig::from_raw(
        option_env!("SCHOOL_ADMIN_COMMIT_MODE"),
        option_env!("SCHOOL_ADMIN_REQUEST_TIMEOUT_MS"),
        option_env!("SCHOOL_ADMIN_BATCH_CONCURRENCY"),
    )
}

/// Join a server path onto [`API_BASE`].
pub fn api_url(path: &str) -> String {
    let base = API_BASE.trim_end_matches('/');
    format!("{base}{path}")
}
