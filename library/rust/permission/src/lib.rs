//! oos-permission: ロール権限のカタログとパック文字列コーデック
//!
//! 権限集合をフラグ 1 つにつき 1 文字の短い文字列に詰めて保存し、
//! 認可判定時に文字の有無だけで照合できるようにする。
//!
//! # 使い方
//!
//! ```
//! use oos_permission::{has_permission, pack, unpack, Permission};
//!
//! let packed = pack([Permission::ProviderRead, Permission::WorkshopRead]);
//! assert!(has_permission(&packed, Permission::ProviderRead));
//! assert_eq!(unpack(&packed).len(), 2);
//! ```

pub mod catalog;
pub mod error;
pub mod packer;
pub mod permission;

pub use catalog::{PermissionCatalog, PermissionFlag, CURRENT_VERSION};
pub use error::CatalogError;
pub use packer::{canonicalize, has_permission, pack, unpack, PermissionPacker};
pub use permission::Permission;
