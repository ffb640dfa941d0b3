//! パーミッションカタログ: フラグと 1 文字表現の対応表。
//!
//! 一度永続化された文字は意味を変えてはならないため、カタログは不変で
//! バージョンを持ち、拡張は追記のみ許可する。

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::LazyLock;

use crate::error::CatalogError;
use crate::permission::Permission;

/// カタログに載せられるフラグ型の境界。
pub trait PermissionFlag: Copy + Ord + Hash + Debug {}

impl<T: Copy + Ord + Hash + Debug> PermissionFlag for T {}

/// パック文字列に使えない文字。SQL の LIKE やクォートと衝突する。
const RESERVED_CHARS: [char; 6] = ['\'', '"', '\\', '`', '%', '_'];

/// v1 の文字表。`Permission::ALL` と同じ並びで 1 文字ずつ対応する。
const V1_CHARS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$&()*+-.~";

/// 現行カタログのバージョン。
pub const CURRENT_VERSION: u32 = 1;

static CURRENT: LazyLock<PermissionCatalog<Permission>> = LazyLock::new(|| {
    PermissionCatalog::from_trusted(
        CURRENT_VERSION,
        Permission::ALL.iter().copied().zip(V1_CHARS.chars()),
    )
});

/// PermissionCatalog はフラグと文字の双方向対応を保持する。
#[derive(Debug, Clone)]
pub struct PermissionCatalog<F: PermissionFlag> {
    version: u32,
    by_flag: BTreeMap<F, char>,
    by_char: HashMap<char, F>,
}

impl PermissionCatalog<Permission> {
    /// 現行（v1）のカタログを返す。初回参照時に一度だけ構築される。
    pub fn current() -> &'static PermissionCatalog<Permission> {
        &CURRENT
    }
}

impl<F: PermissionFlag> PermissionCatalog<F> {
    /// 割り当て一覧からカタログを構築する。
    pub fn new<I>(version: u32, assignments: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (F, char)>,
    {
        let mut catalog = Self {
            version,
            by_flag: BTreeMap::new(),
            by_char: HashMap::new(),
        };
        for (flag, ch) in assignments {
            catalog.assign(flag, ch)?;
        }
        Ok(catalog)
    }

    /// 既存の割り当てを保ったままフラグを追加した新しいカタログを返す。
    ///
    /// 既に使われている文字の再割り当ては `CharacterReassigned` になる。
    pub fn extend<I>(&self, version: u32, additions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (F, char)>,
    {
        if version <= self.version {
            return Err(CatalogError::VersionNotIncreased {
                current: self.version,
                requested: version,
            });
        }
        let mut next = self.clone();
        next.version = version;
        for (flag, ch) in additions {
            if self.by_char.contains_key(&ch) {
                return Err(CatalogError::CharacterReassigned(ch));
            }
            next.assign(flag, ch)?;
        }
        Ok(next)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn char_of(&self, flag: F) -> Option<char> {
        self.by_flag.get(&flag).copied()
    }

    pub fn flag_of(&self, ch: char) -> Option<F> {
        self.by_char.get(&ch).copied()
    }

    /// 登録済みフラグをフラグ昇順で返す。
    pub fn flags(&self) -> impl Iterator<Item = F> + '_ {
        self.by_flag.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_flag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_flag.is_empty()
    }

    fn assign(&mut self, flag: F, ch: char) -> Result<(), CatalogError> {
        if !is_allowed_char(ch) {
            return Err(CatalogError::InvalidCharacter(ch));
        }
        if self.by_char.contains_key(&ch) {
            return Err(CatalogError::DuplicateCharacter(ch));
        }
        if self.by_flag.contains_key(&flag) {
            return Err(CatalogError::DuplicateFlag(format!("{flag:?}")));
        }
        self.by_flag.insert(flag, ch);
        self.by_char.insert(ch, flag);
        Ok(())
    }

    // 検証済みの静的な表専用。内容はテストで new() と突き合わせている。
    fn from_trusted<I>(version: u32, assignments: I) -> Self
    where
        I: IntoIterator<Item = (F, char)>,
    {
        let mut by_flag = BTreeMap::new();
        let mut by_char = HashMap::new();
        for (flag, ch) in assignments {
            by_flag.insert(flag, ch);
            by_char.insert(ch, flag);
        }
        Self {
            version,
            by_flag,
            by_char,
        }
    }
}

fn is_allowed_char(ch: char) -> bool {
    !ch.is_control() && !ch.is_whitespace() && !RESERVED_CHARS.contains(&ch)
}
