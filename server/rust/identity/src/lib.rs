//! oos-identity-server: ロール別パックパーミッションの管理と、エンティティ変更ログの記録・検索を提供する。

pub mod adapter;
pub mod domain;
pub mod infrastructure;
pub mod usecase;
