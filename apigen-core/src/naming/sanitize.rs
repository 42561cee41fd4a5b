//! Identifier sanitation helpers.

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

use super::translate::Translator;

/// `{param}` path placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("Invalid placeholder regex"));

/// Path parameter names, e.g. `id` in `/user/{id}`.
static PATH_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid path parameter regex"));

/// URL templates that stand for the server base address.
const BASE_URL_TEMPLATES: [&str; 2] = ["{{baseurl}}", "{{baseUrl}}"];

/// Name used when a URL has no usable segment. Never accepted as a class name.
pub const DEGENERATE_URL_NAME: &str = "Api";

/// Fallback class name when sanitation leaves nothing.
pub const FALLBACK_CLASS_NAME: &str = "Item";

/// Fallback category folder.
pub const DEFAULT_CATEGORY_FOLDER: &str = "default";

/// PascalCase `text`, treating every non-alphanumeric character as a word
/// separator and keeping camel-case boundaries.
pub fn pascal(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_case(Case::Pascal))
        .collect()
}

/// Turn free text into a class name safe for a target with `keywords`.
pub fn sanitize_class_name(text: &str, translator: &mut Translator, keywords: &[&str]) -> String {
    let mut name = pascal(&translator.translate(text));
    if name.is_empty() {
        name = FALLBACK_CLASS_NAME.to_string();
    }

    if keywords.contains(&name.to_lowercase().as_str()) {
        name.push_str("Type");
    }

    if !name.chars().next().is_some_and(char::is_alphabetic) {
        name.insert(0, 'A');
    }

    name
}

/// Request path of `url`: no scheme, host, query string or base-URL
/// template, with a single leading `/`.
pub fn url_path(url: &str) -> String {
    let mut path = url.trim();
    if let Some((_, rest)) = path.split_once("://") {
        path = rest.find('/').map_or("", |idx| &rest[idx..]);
    }
    if let Some((before, _)) = path.split_once('?') {
        path = before;
    }

    let mut cleaned = path.to_string();
    for template in BASE_URL_TEMPLATES {
        cleaned = cleaned.replace(template, "");
    }
    while cleaned.contains("//") {
        cleaned = cleaned.replace("//", "/");
    }
    if !cleaned.starts_with('/') {
        cleaned.insert(0, '/');
    }
    cleaned
}

/// Names of the `{param}` placeholders in `url`, in order.
pub fn path_params(url: &str) -> Vec<String> {
    PATH_PARAM_RE
        .captures_iter(&url_path(url))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// camelCase method name from the last path segment of `url`, skipping a
/// trailing placeholder segment.
pub fn url_method_name(url: &str) -> Option<String> {
    let path = url_path(url);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.trim().is_empty()).collect();
    let last = segments.last()?;

    let mut segment = PLACEHOLDER_RE.replace_all(last, "").into_owned();
    if segment.is_empty() && segments.len() > 1 {
        segment = PLACEHOLDER_RE
            .replace_all(segments[segments.len() - 2], "")
            .into_owned();
    }

    let name = pascal(&segment).to_case(Case::Camel);
    (!name.is_empty()).then_some(name)
}

/// Class name built from the last `depth` path segments of `url`.
///
/// Returns `None` when no segment survives, i.e. the degenerate `Api` name.
pub fn url_class_name(url: &str, depth: usize) -> Option<String> {
    let path = url_path(url);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.trim().is_empty()).collect();
    if segments.is_empty() {
        return None;
    }

    let depth = depth.clamp(1, segments.len());
    let name: String = segments[segments.len() - depth..]
        .iter()
        .map(|segment| PLACEHOLDER_RE.replace_all(segment, ""))
        .map(|segment| pascal(&segment))
        .collect();

    if name.is_empty() || name == DEGENERATE_URL_NAME {
        None
    } else {
        Some(name)
    }
}

/// Folder name for a category: ASCII word characters only, lowercase, never
/// starting with a digit.
pub fn category_folder(category: &str, translator: &mut Translator) -> String {
    let translated = translator.translate(category);
    let mut name: String = translated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert_str(0, "cat_");
    }

    if name.is_empty() {
        DEFAULT_CATEGORY_FOLDER.to_string()
    } else {
        name.to_lowercase()
    }
}

/// Append `suffix` unless `name` already ends with it.
pub fn with_suffix(name: &str, suffix: &str) -> String {
    if suffix.is_empty() || name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Remove one trailing `suffix`, if present.
pub fn without_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        name
    } else {
        name.strip_suffix(suffix).unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYWORDS: &[&str] = &["class", "object", "val"];

    #[test]
    fn test_pascal_keeps_camel_boundaries() {
        assert_eq!(pascal("infoDetail"), "InfoDetail");
        assert_eq!(pascal("send_sms"), "SendSms");
        assert_eq!(pascal("order-verify"), "OrderVerify");
        assert_eq!(pascal("list.json"), "ListJson");
        assert_eq!(pascal("__"), "");
    }

    #[test]
    fn test_sanitize_class_name_rules() {
        let mut t = Translator::default();
        assert_eq!(sanitize_class_name("user info", &mut t, KEYWORDS), "Userinfo");
        assert_eq!(sanitize_class_name("user_info", &mut t, KEYWORDS), "UserInfo");
        assert_eq!(sanitize_class_name("class", &mut t, KEYWORDS), "ClassType");
        assert_eq!(sanitize_class_name("123", &mut t, KEYWORDS), "A123");
        assert_eq!(sanitize_class_name("", &mut t, KEYWORDS), "Item");
        assert_eq!(sanitize_class_name("用户资料", &mut t, KEYWORDS), "Item");
    }

    #[test]
    fn test_url_class_name_depths() {
        assert_eq!(url_class_name("/api/v1/ad/config", 1).as_deref(), Some("Config"));
        assert_eq!(url_class_name("/api/v1/ad/config", 2).as_deref(), Some("AdConfig"));
        assert_eq!(url_class_name("/a/b", 9).as_deref(), Some("AB"));
        assert_eq!(url_class_name("/v1/user/infoDetail", 2).as_deref(), Some("UserInfoDetail"));
    }

    #[test]
    fn test_url_class_name_cleanup() {
        assert_eq!(
            url_class_name("https://host.example.com/user/list?page=1", 1).as_deref(),
            Some("List")
        );
        assert_eq!(url_class_name("{{baseUrl}}/order/detail", 2).as_deref(), Some("OrderDetail"));
        assert_eq!(url_class_name("/user/{id}/profile", 2).as_deref(), Some("Profile"));
        assert_eq!(url_class_name("/user/{id}", 1), None);
        assert_eq!(url_class_name("https://host.example.com", 1), None);
        assert_eq!(url_class_name("", 1), None);
        assert_eq!(url_class_name("/api", 1), None);
    }

    #[test]
    fn test_url_path_and_params() {
        assert_eq!(url_path("{{baseurl}}/v1/user/{id}?x=1"), "/v1/user/{id}");
        assert_eq!(url_path("https://host.example.com/a//b"), "/a/b");
        assert_eq!(url_path("order/list"), "/order/list");
        assert_eq!(url_path("https://host.example.com"), "/");
        assert_eq!(path_params("{{baseUrl}}/shop/{shopId}/item/{id}"), vec!["shopId", "id"]);
        assert!(path_params("/user/list").is_empty());
    }

    #[test]
    fn test_url_method_name() {
        assert_eq!(url_method_name("/api/v1/sendsms").as_deref(), Some("sendsms"));
        assert_eq!(url_method_name("/api/v1/start_use").as_deref(), Some("startUse"));
        assert_eq!(url_method_name("/api/v1/user-app").as_deref(), Some("userApp"));
        assert_eq!(url_method_name("/user/{id}").as_deref(), Some("user"));
        assert_eq!(url_method_name("/{id}"), None);
        assert_eq!(url_method_name(""), None);
    }

    #[test]
    fn test_category_folder() {
        let mut t = Translator::default();
        assert_eq!(category_folder("User Center", &mut t), "usercenter");
        assert_eq!(category_folder("2024 活动", &mut t), "item");
        assert_eq!(category_folder("2024_events", &mut t), "cat_2024_events");
        assert_eq!(category_folder("默认", &mut t), "default");
        assert_eq!(category_folder("应用", &mut t), "app");
        assert_eq!(category_folder("", &mut t), "default");
    }

    #[test]
    fn test_suffix_helpers() {
        assert_eq!(with_suffix("User", "Bean"), "UserBean");
        assert_eq!(with_suffix("UserBean", "Bean"), "UserBean");
        assert_eq!(with_suffix("User", ""), "User");
        assert_eq!(without_suffix("UserBean", "Bean"), "User");
        assert_eq!(without_suffix("User", ""), "User");
    }
}
