use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单个账号的凭据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default)]
    pub access_token: String,
    /// 未使用（不做刷新），仅随授权结果一并保存
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// 凭据文件的顶层结构：`{ "accounts": { "<open_id>": {...} } }`
///
/// 使用 `IndexMap` 保留文件中的账号顺序，`pick_any` 取第一个。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(default)]
    pub accounts: IndexMap<String, CredentialRecord>,
}

impl TokenFile {
    /// 迭代顺序中的第一个账号
    pub fn first(&self) -> Option<(&str, &CredentialRecord)> {
        self.accounts.first().map(|(k, v)| (k.as_str(), v))
    }
}
