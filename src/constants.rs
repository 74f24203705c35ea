/// Site name constants shared by the factory, the CLI and configuration.

pub const WORK_UA_SITE: &str = "work_ua";
pub const ROBOTA_UA_SITE: &str = "robota_ua";

pub const WORK_UA_BASE_URL: &str = "https://www.work.ua";
pub const ROBOTA_UA_BASE_URL: &str = "https://robota.ua";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Get all supported site names, in the order their results are concatenated
pub fn get_supported_sites() -> Vec<&'static str> {
    vec![WORK_UA_SITE, ROBOTA_UA_SITE]
}

/// Accepts the short host-style aliases used on the command line
pub fn site_alias_to_name(alias: &str) -> String {
    match alias.trim().to_lowercase().as_str() {
        "work.ua" | "workua" | "work_ua" | "a" => WORK_UA_SITE.to_string(),
        "robota.ua" | "robotaua" | "robota_ua" | "b" => ROBOTA_UA_SITE.to_string(),
        other => other.to_string(),
    }
}
