//! Column whitelist for member record updates
//!
//! Caller-supplied column names are parsed into this closed enum before any
//! store access; every statement the enum dispatches to is a fixed string.
//! Caller input is only ever bound as a parameter, never interpolated into
//! SQL.

/// The fixed set of member columns eligible for update
///
/// `id`, `membership_code`, and `created_at` are deliberately absent: they
/// are immutable and no update path can reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberColumn {
    Name,
    Email,
    Phone,
    Department,
    RegNumber,
    Year,
}

impl MemberColumn {
    /// Parse a caller-supplied column name against the whitelist
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "department" => Some(Self::Department),
            "reg_number" => Some(Self::RegNumber),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    /// Canonical column name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Department => "department",
            Self::RegNumber => "reg_number",
            Self::Year => "year",
        }
    }

    /// Whether this column is a unique contact key (email or phone)
    pub fn is_contact(&self) -> bool {
        matches!(self, Self::Email | Self::Phone)
    }

    /// Fixed single-column update statement for this column
    pub(crate) fn update_sql(&self) -> &'static str {
        match self {
            Self::Name => "UPDATE members SET name = ?1 WHERE id = ?2",
            Self::Email => "UPDATE members SET email = ?1 WHERE id = ?2",
            Self::Phone => "UPDATE members SET phone = ?1 WHERE id = ?2",
            Self::Department => "UPDATE members SET department = ?1 WHERE id = ?2",
            Self::RegNumber => "UPDATE members SET reg_number = ?1 WHERE id = ?2",
            Self::Year => "UPDATE members SET year = ?1 WHERE id = ?2",
        }
    }

    /// Fixed uniqueness probe for contact columns, excluding the updated row
    pub(crate) fn conflict_sql(&self) -> Option<&'static str> {
        match self {
            Self::Email => Some("SELECT id FROM members WHERE email = ?1 AND id != ?2"),
            Self::Phone => Some("SELECT id FROM members WHERE phone = ?1 AND id != ?2"),
            _ => None,
        }
    }
}
