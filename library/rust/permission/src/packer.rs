//! パーミッション集合と文字列表現の相互変換。
//!
//! パック文字列はフラグ 1 つにつき 1 文字で、フラグ昇順に並ぶ。
//! 不正な文字列でもエラーにはせず、未知の文字は読み飛ばす。

use std::collections::BTreeSet;

use crate::catalog::{PermissionCatalog, PermissionFlag};
use crate::permission::Permission;

/// PermissionPacker は注入されたカタログを使ってパック・アンパックを行う。
#[derive(Debug, Clone, Copy)]
pub struct PermissionPacker<'a, F: PermissionFlag> {
    catalog: &'a PermissionCatalog<F>,
}

impl<'a, F: PermissionFlag> PermissionPacker<'a, F> {
    pub fn new(catalog: &'a PermissionCatalog<F>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a PermissionCatalog<F> {
        self.catalog
    }

    /// フラグ集合をパック文字列に変換する。カタログにないフラグは無視する。
    pub fn pack<I>(&self, flags: I) -> String
    where
        I: IntoIterator<Item = F>,
    {
        flags
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|flag| self.catalog.char_of(flag))
            .collect()
    }

    /// パック文字列をフラグ集合に戻す。失敗しない。
    pub fn unpack(&self, packed: &str) -> BTreeSet<F> {
        packed
            .chars()
            .filter_map(|ch| self.catalog.flag_of(ch))
            .collect()
    }

    /// パック文字列に指定フラグが含まれるかを判定する。
    pub fn has_permission(&self, packed: &str, flag: F) -> bool {
        match self.catalog.char_of(flag) {
            Some(ch) => packed.contains(ch),
            None => false,
        }
    }

    /// 重複や未知の文字を取り除き、正規の並びに揃える。
    pub fn canonicalize(&self, packed: &str) -> String {
        self.pack(self.unpack(packed))
    }
}

impl PermissionPacker<'static, Permission> {
    /// 現行カタログを使うパッカー。
    pub fn current() -> Self {
        Self::new(PermissionCatalog::current())
    }
}

pub fn pack<I>(permissions: I) -> String
where
    I: IntoIterator<Item = Permission>,
{
    PermissionPacker::current().pack(permissions)
}

pub fn unpack(packed: &str) -> BTreeSet<Permission> {
    PermissionPacker::current().unpack(packed)
}

pub fn has_permission(packed: &str, permission: Permission) -> bool {
    PermissionPacker::current().has_permission(packed, permission)
}

pub fn canonicalize(packed: &str) -> String {
    PermissionPacker::current().canonicalize(packed)
}
