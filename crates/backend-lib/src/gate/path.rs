//! Request path helpers.

/// Drop the site's routing prefix, if configured and present.
pub fn strip_relative_path<'a>(path: &'a str, relative_path: &str) -> &'a str {
    if relative_path.is_empty() {
        return path;
    }
    path.strip_prefix(relative_path).unwrap_or(path)
}

/// Path relative to the admin root.
///
/// `/api`, `/v3` and `/admin/` are each stripped at most once, in that order.
/// A path outside the admin root comes back unchanged.
pub fn admin_path(path: &str) -> &str {
    let rest = path.strip_prefix("/api").unwrap_or(path);
    let rest = rest.strip_prefix("/v3").unwrap_or(rest);
    match rest.strip_prefix("/admin") {
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest),
        None => path,
    }
}

/// Whether the caller expects a structured API response.
pub fn is_api_path(path: &str, relative_path: &str) -> bool {
    let local = strip_relative_path(path, relative_path);
    local == "/api" || local.starts_with("/api/")
}

/// Destination to return to after a forced login.
pub fn return_to(path: &str, relative_path: &str) -> String {
    let local = strip_relative_path(path, relative_path);
    local.strip_prefix("/api").unwrap_or(local).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_path() {
        assert_eq!(admin_path("/admin"), "");
        assert_eq!(admin_path("/admin/"), "");
        assert_eq!(admin_path("/admin/manage/users"), "manage/users");
        assert_eq!(admin_path("/api/admin/manage/users"), "manage/users");
        assert_eq!(admin_path("/api/v3/admin/settings/general"), "settings/general");
        assert_eq!(admin_path("/v3/admin/dashboard"), "dashboard");
    }

    #[test]
    fn test_admin_path_strips_each_prefix_once() {
        assert_eq!(admin_path("/admin/admin/users"), "admin/users");
        assert_eq!(admin_path("/api/api/admin"), "/api/api/admin");
    }

    #[test]
    fn test_admin_path_outside_admin_root() {
        assert_eq!(admin_path("/api/v3/users"), "/api/v3/users");
        assert_eq!(admin_path("/login"), "/login");
    }

    #[test]
    fn test_strip_relative_path() {
        assert_eq!(strip_relative_path("/forum/admin", "/forum"), "/admin");
        assert_eq!(strip_relative_path("/admin", "/forum"), "/admin");
        assert_eq!(strip_relative_path("/admin", ""), "/admin");
    }

    #[test]
    fn test_is_api_path() {
        assert!(is_api_path("/api/admin", ""));
        assert!(is_api_path("/forum/api/v3/admin/users", "/forum"));
        assert!(!is_api_path("/admin/api", ""));
        assert!(!is_api_path("/apiary", ""));
    }

    #[test]
    fn test_return_to() {
        assert_eq!(return_to("/forum/api/admin/manage/users", "/forum"), "/admin/manage/users");
        assert_eq!(return_to("/admin/settings", ""), "/admin/settings");
        assert_eq!(return_to("/api/v3/admin", ""), "/v3/admin");
    }
}
