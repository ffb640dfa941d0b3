use thiserror::Error;

/// CatalogError はカタログの構築・拡張時の不整合を表す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("character {0:?} is assigned to more than one flag")]
    DuplicateCharacter(char),

    #[error("flag {0} is assigned more than once")]
    DuplicateFlag(String),

    #[error("character {0:?} is not allowed in packed permissions")]
    InvalidCharacter(char),

    #[error("character {0:?} is already shipped and cannot be reassigned")]
    CharacterReassigned(char),

    #[error("catalog version must increase: current {current}, requested {requested}")]
    VersionNotIncreased { current: u32, requested: u32 },
}
