use serde::{Deserialize, Serialize};

/// Claims はアクセストークンの Claims を表す。
/// `permissions` はロールに紐づくパック済みパーミッション文字列。
/// 空の場合は認証ミドルウェアが `role` と `is_derived` から解決する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: String,
    #[serde(default)]
    pub is_derived: bool,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
}
