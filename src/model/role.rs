use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Access tier assigned to a user by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Hr,
    Manager,
    Admin,
    SuperAdmin,
}

/// Capability granted by a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Authority {
    UserRead,
    UserUpdate,
    UserCreate,
    UserDelete,
}

const USER_AUTHORITIES: &[Authority] = &[Authority::UserRead];
const HR_AUTHORITIES: &[Authority] = &[Authority::UserRead, Authority::UserUpdate];
const MANAGER_AUTHORITIES: &[Authority] = &[Authority::UserRead, Authority::UserUpdate];
const ADMIN_AUTHORITIES: &[Authority] = &[
    Authority::UserRead,
    Authority::UserUpdate,
    Authority::UserCreate,
];
const SUPER_ADMIN_AUTHORITIES: &[Authority] = &[
    Authority::UserRead,
    Authority::UserUpdate,
    Authority::UserCreate,
    Authority::UserDelete,
];

impl Role {
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Hr,
        Role::Manager,
        Role::Admin,
        Role::SuperAdmin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Hr => "ROLE_HR",
            Role::Manager => "ROLE_MANAGER",
            Role::Admin => "ROLE_ADMIN",
            Role::SuperAdmin => "ROLE_SUPER_ADMIN",
        }
    }

    /// Accepts the wire form (`ROLE_ADMIN`) as well as the bare name (`admin`).
    pub fn parse(s: &str) -> Option<Role> {
        let s = s.trim();
        let bare = s
            .strip_prefix("ROLE_")
            .or_else(|| s.strip_prefix("role_"))
            .unwrap_or(s);
        Role::ALL
            .into_iter()
            .find(|r| r.as_str()["ROLE_".len()..].eq_ignore_ascii_case(bare))
    }

    pub fn authorities(self) -> &'static [Authority] {
        match self {
            Role::User => USER_AUTHORITIES,
            Role::Hr => HR_AUTHORITIES,
            Role::Manager => MANAGER_AUTHORITIES,
            Role::Admin => ADMIN_AUTHORITIES,
            Role::SuperAdmin => SUPER_ADMIN_AUTHORITIES,
        }
    }

    pub fn has(self, authority: Authority) -> bool {
        self.authorities().contains(&authority)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{}'", s))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Role::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown role '{}'", s)))
    }
}

/// Lenient role field: unknown, empty or null strings become `None`.
pub(crate) fn deserialize_optional_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::parse))
}

impl Authority {
    pub fn as_str(self) -> &'static str {
        match self {
            Authority::UserRead => "user:read",
            Authority::UserUpdate => "user:update",
            Authority::UserCreate => "user:create",
            Authority::UserDelete => "user:delete",
        }
    }

    pub fn parse(s: &str) -> Option<Authority> {
        match s.trim() {
            "user:read" => Some(Authority::UserRead),
            "user:update" => Some(Authority::UserUpdate),
            "user:create" => Some(Authority::UserCreate),
            "user:delete" => Some(Authority::UserDelete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
