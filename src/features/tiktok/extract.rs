use serde_json::Value;

/// 字段提取规则：按顺序尝试的 JSON 路径列表，命中第一个有效值即返回。
///
/// 平台的响应有时把字段包在 `data` 下，有时平铺在顶层，且偶见 camelCase 别名。
pub type FieldRules = &'static [&'static [&'static str]];

pub const ACCESS_TOKEN: FieldRules = &[
    &["data", "access_token"],
    &["access_token"],
    &["accessToken"],
];
pub const OPEN_ID: FieldRules = &[&["data", "open_id"], &["open_id"], &["openId"]];
pub const REFRESH_TOKEN: FieldRules = &[
    &["data", "refresh_token"],
    &["refresh_token"],
    &["refreshToken"],
];
pub const UPLOAD_URL: FieldRules = &[&["upload_url"], &["data", "upload_url"]];
pub const VIDEO_ID: FieldRules = &[&["video_id"], &["data", "video_id"]];

fn lookup<'a>(body: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(body, |v, key| v.get(*key))
}

/// 取第一个非空字符串
pub fn extract_str(body: &Value, rules: FieldRules) -> Option<String> {
    rules
        .iter()
        .filter_map(|path| lookup(body, path))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// 取第一个非 null 的值（`video_id` 可能是字符串也可能是数字）
pub fn extract_value(body: &Value, rules: FieldRules) -> Option<Value> {
    rules
        .iter()
        .filter_map(|path| lookup(body, path))
        .find(|v| !v.is_null())
        .cloned()
}
