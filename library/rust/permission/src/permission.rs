use serde::{Deserialize, Serialize};

/// Permission はロールに付与できる個々の権限を表す。
///
/// 判別値は管理画面で提示する数値コードであり、一度公開した値は変更しない。
/// 永続化時の 1 文字表現は [`crate::PermissionCatalog`] が管理する。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(i16)]
pub enum Permission {
    /// ロールにパーミッションが登録されていない状態を示す。何も許可しない。
    NotSet = 0,

    AddressRead = 1,
    AddressEdit = 2,
    AddressAddNew = 3,
    AddressRemove = 4,

    ApplicationRead = 10,
    ApplicationEdit = 11,
    ApplicationAddNew = 12,
    ApplicationRemove = 13,

    ChildRead = 20,
    ChildEdit = 21,
    ChildAddNew = 22,
    ChildRemove = 23,

    FavoriteRead = 30,
    FavoriteEdit = 31,
    FavoriteAddNew = 32,
    FavoriteRemove = 33,

    ParentRead = 40,
    ParentEdit = 41,
    ParentAddNew = 42,
    ParentRemove = 43,
    ParentBlock = 44,

    ProviderRead = 50,
    ProviderEdit = 51,
    ProviderAddNew = 52,
    ProviderRemove = 53,
    Employees = 54,
    ProviderApprove = 55,
    ProviderBlock = 56,

    RatingRead = 60,
    RatingEdit = 61,
    RatingAddNew = 62,
    RatingRemove = 63,

    TeacherRead = 70,
    TeacherEdit = 71,
    TeacherAddNew = 72,
    TeacherRemove = 73,

    UserRead = 80,
    UserEdit = 81,
    UserAddNew = 82,
    UserRemove = 83,
    PersonalInfo = 84,

    WorkshopRead = 90,
    WorkshopEdit = 91,
    WorkshopAddNew = 92,
    WorkshopRemove = 93,
    WorkshopApprove = 94,

    SystemManagement = 100,
    ImpersonalDataRead = 101,
    LogDataRead = 102,
    AdminDataRead = 103,

    MinistryAdminRead = 110,
    MinistryAdminEdit = 111,
    MinistryAdminAddNew = 112,
    MinistryAdminRemove = 113,
    MinistryAdmins = 114,

    RegionAdminRead = 120,
    RegionAdminEdit = 121,
    RegionAdminAddNew = 122,
    RegionAdminRemove = 123,
    RegionAdmins = 124,
    RegionAdminBlock = 125,

    // 130-135 は過去のマイグレーションと衝突するため欠番
    AreaAdminRead = 140,
    AreaAdminEdit = 141,
    AreaAdminAddNew = 142,
    AreaAdminRemove = 143,
    AreaAdmins = 144,
    AreaAdminBlock = 145,

    CompetitiveEventRead = 150,
    CompetitiveEventEdit = 151,
    CompetitiveEventAddNew = 152,
    CompetitiveEventRemove = 153,

    /// 全ての権限チェックを通過するスーパー管理者権限。
    AccessAll = i16::MAX,
}

impl Permission {
    /// 定義済みの全パーミッション（コード昇順）。
    pub const ALL: [Permission; 73] = [
        Permission::NotSet,
        Permission::AddressRead,
        Permission::AddressEdit,
        Permission::AddressAddNew,
        Permission::AddressRemove,
        Permission::ApplicationRead,
        Permission::ApplicationEdit,
        Permission::ApplicationAddNew,
        Permission::ApplicationRemove,
        Permission::ChildRead,
        Permission::ChildEdit,
        Permission::ChildAddNew,
        Permission::ChildRemove,
        Permission::FavoriteRead,
        Permission::FavoriteEdit,
        Permission::FavoriteAddNew,
        Permission::FavoriteRemove,
        Permission::ParentRead,
        Permission::ParentEdit,
        Permission::ParentAddNew,
        Permission::ParentRemove,
        Permission::ParentBlock,
        Permission::ProviderRead,
        Permission::ProviderEdit,
        Permission::ProviderAddNew,
        Permission::ProviderRemove,
        Permission::Employees,
        Permission::ProviderApprove,
        Permission::ProviderBlock,
        Permission::RatingRead,
        Permission::RatingEdit,
        Permission::RatingAddNew,
        Permission::RatingRemove,
        Permission::TeacherRead,
        Permission::TeacherEdit,
        Permission::TeacherAddNew,
        Permission::TeacherRemove,
        Permission::UserRead,
        Permission::UserEdit,
        Permission::UserAddNew,
        Permission::UserRemove,
        Permission::PersonalInfo,
        Permission::WorkshopRead,
        Permission::WorkshopEdit,
        Permission::WorkshopAddNew,
        Permission::WorkshopRemove,
        Permission::WorkshopApprove,
        Permission::SystemManagement,
        Permission::ImpersonalDataRead,
        Permission::LogDataRead,
        Permission::AdminDataRead,
        Permission::MinistryAdminRead,
        Permission::MinistryAdminEdit,
        Permission::MinistryAdminAddNew,
        Permission::MinistryAdminRemove,
        Permission::MinistryAdmins,
        Permission::RegionAdminRead,
        Permission::RegionAdminEdit,
        Permission::RegionAdminAddNew,
        Permission::RegionAdminRemove,
        Permission::RegionAdmins,
        Permission::RegionAdminBlock,
        Permission::AreaAdminRead,
        Permission::AreaAdminEdit,
        Permission::AreaAdminAddNew,
        Permission::AreaAdminRemove,
        Permission::AreaAdmins,
        Permission::AreaAdminBlock,
        Permission::CompetitiveEventRead,
        Permission::CompetitiveEventEdit,
        Permission::CompetitiveEventAddNew,
        Permission::CompetitiveEventRemove,
        Permission::AccessAll,
    ];

    /// 管理画面で提示する数値コードを返す。
    pub fn code(self) -> i16 {
        self as i16
    }

    /// 数値コードから Permission を引く。未定義のコードは None。
    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// 権限が属するグループ名を返す。
    pub fn group(self) -> &'static str {
        use Permission::*;
        match self {
            NotSet => "NotSet",
            AddressRead | AddressEdit | AddressAddNew | AddressRemove => "Address",
            ApplicationRead | ApplicationEdit | ApplicationAddNew | ApplicationRemove => {
                "Application"
            }
            ChildRead | ChildEdit | ChildAddNew | ChildRemove => "Child",
            FavoriteRead | FavoriteEdit | FavoriteAddNew | FavoriteRemove => "Favorite",
            ParentRead | ParentEdit | ParentAddNew | ParentRemove | ParentBlock => "Parent",
            ProviderRead | ProviderEdit | ProviderAddNew | ProviderRemove | Employees
            | ProviderApprove | ProviderBlock => "Provider",
            RatingRead | RatingEdit | RatingAddNew | RatingRemove => "Rating",
            TeacherRead | TeacherEdit | TeacherAddNew | TeacherRemove => "Teacher",
            UserRead | UserEdit | UserAddNew | UserRemove | PersonalInfo => "User",
            WorkshopRead | WorkshopEdit | WorkshopAddNew | WorkshopRemove | WorkshopApprove => {
                "Workshop"
            }
            SystemManagement | ImpersonalDataRead | LogDataRead | AccessAll => "SystemManaging",
            AdminDataRead => "AdminDataRead",
            MinistryAdminRead | MinistryAdminEdit | MinistryAdminAddNew | MinistryAdminRemove
            | MinistryAdmins => "MinistryAdmin",
            RegionAdminRead | RegionAdminEdit | RegionAdminAddNew | RegionAdminRemove
            | RegionAdmins | RegionAdminBlock => "RegionAdmin",
            AreaAdminRead | AreaAdminEdit | AreaAdminAddNew | AreaAdminRemove | AreaAdmins
            | AreaAdminBlock => "AreaAdmin",
            CompetitiveEventRead
            | CompetitiveEventEdit
            | CompetitiveEventAddNew
            | CompetitiveEventRemove => "CompetitiveEvent",
        }
    }

    /// 権限の識別名（列挙子名）を返す。
    pub fn name(self) -> &'static str {
        use Permission::*;
        match self {
            NotSet => "NotSet",
            AddressRead => "AddressRead",
            AddressEdit => "AddressEdit",
            AddressAddNew => "AddressAddNew",
            AddressRemove => "AddressRemove",
            ApplicationRead => "ApplicationRead",
            ApplicationEdit => "ApplicationEdit",
            ApplicationAddNew => "ApplicationAddNew",
            ApplicationRemove => "ApplicationRemove",
            ChildRead => "ChildRead",
            ChildEdit => "ChildEdit",
            ChildAddNew => "ChildAddNew",
            ChildRemove => "ChildRemove",
            FavoriteRead => "FavoriteRead",
            FavoriteEdit => "FavoriteEdit",
            FavoriteAddNew => "FavoriteAddNew",
            FavoriteRemove => "FavoriteRemove",
            ParentRead => "ParentRead",
            ParentEdit => "ParentEdit",
            ParentAddNew => "ParentAddNew",
            ParentRemove => "ParentRemove",
            ParentBlock => "ParentBlock",
            ProviderRead => "ProviderRead",
            ProviderEdit => "ProviderEdit",
            ProviderAddNew => "ProviderAddNew",
            ProviderRemove => "ProviderRemove",
            Employees => "Employees",
            ProviderApprove => "ProviderApprove",
            ProviderBlock => "ProviderBlock",
            RatingRead => "RatingRead",
            RatingEdit => "RatingEdit",
            RatingAddNew => "RatingAddNew",
            RatingRemove => "RatingRemove",
            TeacherRead => "TeacherRead",
            TeacherEdit => "TeacherEdit",
            TeacherAddNew => "TeacherAddNew",
            TeacherRemove => "TeacherRemove",
            UserRead => "UserRead",
            UserEdit => "UserEdit",
            UserAddNew => "UserAddNew",
            UserRemove => "UserRemove",
            PersonalInfo => "PersonalInfo",
            WorkshopRead => "WorkshopRead",
            WorkshopEdit => "WorkshopEdit",
            WorkshopAddNew => "WorkshopAddNew",
            WorkshopRemove => "WorkshopRemove",
            WorkshopApprove => "WorkshopApprove",
            SystemManagement => "SystemManagement",
            ImpersonalDataRead => "ImpersonalDataRead",
            LogDataRead => "LogDataRead",
            AdminDataRead => "AdminDataRead",
            MinistryAdminRead => "MinistryAdminRead",
            MinistryAdminEdit => "MinistryAdminEdit",
            MinistryAdminAddNew => "MinistryAdminAddNew",
            MinistryAdminRemove => "MinistryAdminRemove",
            MinistryAdmins => "MinistryAdmins",
            RegionAdminRead => "RegionAdminRead",
            RegionAdminEdit => "RegionAdminEdit",
            RegionAdminAddNew => "RegionAdminAddNew",
            RegionAdminRemove => "RegionAdminRemove",
            RegionAdmins => "RegionAdmins",
            RegionAdminBlock => "RegionAdminBlock",
            AreaAdminRead => "AreaAdminRead",
            AreaAdminEdit => "AreaAdminEdit",
            AreaAdminAddNew => "AreaAdminAddNew",
            AreaAdminRemove => "AreaAdminRemove",
            AreaAdmins => "AreaAdmins",
            AreaAdminBlock => "AreaAdminBlock",
            CompetitiveEventRead => "CompetitiveEventRead",
            CompetitiveEventEdit => "CompetitiveEventEdit",
            CompetitiveEventAddNew => "CompetitiveEventAddNew",
            CompetitiveEventRemove => "CompetitiveEventRemove",
            AccessAll => "AccessAll",
        }
    }

    /// 管理者向けの一覧表示用文字列を返す。
    /// 例: `ProviderRead. Use code - [50] to add permission.`
    pub fn describe(self) -> String {
        format!("{}. Use code - [{}] to add permission.", self.name(), self.code())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
