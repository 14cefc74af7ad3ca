//! # Member Registry
//!
//! Atomic operations over the member store: register new members, look up by
//! credential, and apply whitelisted partial updates. Every read-then-write
//! sequence is backstopped by the UNIQUE constraints on `email`, `phone`, and
//! `membership_code`, so concurrent operations on the same key cannot both
//! succeed.

pub mod allocator;
pub mod column;
pub mod error;

pub use allocator::CodeAllocator;
pub use column::MemberColumn;
pub use error::RegistryError;

use tracing::{debug, info, warn};

use crate::persistence::{Member, MemberStore, NewMember};

/// Which unique key an insert or update collided on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UniqueKey {
    Email,
    Phone,
    MembershipCode,
}

/// Classify a store error as a unique-constraint violation on a known key
fn unique_violation(err: &sqlx::Error) -> Option<UniqueKey> {
    let sqlx::Error::Database(db) = err else {
        return None;
    };
    if !db.is_unique_violation() {
        return None;
    }
    let message = db.message();
    if message.contains("members.email") {
        Some(UniqueKey::Email)
    } else if message.contains("members.phone") {
        Some(UniqueKey::Phone)
    } else if message.contains("members.membership_code") {
        Some(UniqueKey::MembershipCode)
    } else {
        None
    }
}

/// Map a unique violation during an update to the conflicting field
fn update_violation(err: sqlx::Error) -> RegistryError {
    match unique_violation(&err) {
        Some(UniqueKey::Email) => RegistryError::ConflictingField { field: "email" },
        Some(UniqueKey::Phone) => RegistryError::ConflictingField { field: "phone" },
        _ => RegistryError::Storage(err),
    }
}

/// Locator for the single-column update operation
#[derive(Debug, Clone)]
pub enum MemberLocator {
    /// Surrogate row id
    Id(i64),
    /// Contact pair; a record matches on either key
    Contact {
        email: Option<String>,
        phone: Option<String>,
    },
}

/// Partial update for the credentialed full-field operation
///
/// Identity fields (`name`, `email`, `phone`) change only when supplied
/// non-empty; the optional descriptive fields change whenever supplied,
/// including the empty string, which clears them.
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub reg_number: Option<String>,
    pub year: Option<String>,
}

/// Member registry with atomic registration and update operations
#[derive(Debug, Clone)]
pub struct MemberRegistry {
    store: MemberStore,
    allocator: CodeAllocator,
}

impl MemberRegistry {
    pub fn new(store: MemberStore) -> Self {
        Self {
            store,
            allocator: CodeAllocator::new(),
        }
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &MemberStore {
        &self.store
    }

    /// Register a new member and return the allocated membership code
    ///
    /// Fails with `DuplicateContact` (carrying the existing code) when the
    /// email or phone is already claimed. A code claimed by a concurrent
    /// registration between the allocator's check and the insert is retried
    /// invisibly; the caller only ever sees a fresh unique code.
    pub async fn register(&self, member: &NewMember) -> Result<String, RegistryError> {
        if member.name.is_empty() {
            return Err(RegistryError::MissingField { field: "name" });
        }
        if member.email.is_empty() {
            return Err(RegistryError::MissingField { field: "email" });
        }
        if member.phone.is_empty() {
            return Err(RegistryError::MissingField { field: "phone" });
        }

        if let Some(existing_code) = self
            .store
            .find_code_by_contact(&member.email, &member.phone)
            .await?
        {
            return Err(RegistryError::DuplicateContact { existing_code });
        }

        loop {
            let code = self.allocator.allocate(&self.store).await?;

            match self.store.insert_member(member, &code).await {
                Ok(id) => {
                    info!("Registered member {} with code {}", id, code);
                    return Ok(code);
                }
                Err(err) => match unique_violation(&err) {
                    Some(UniqueKey::MembershipCode) => {
                        debug!("Lost allocation race for code {}, retrying", code);
                        continue;
                    }
                    Some(_) => {
                        // A concurrent registration claimed the contact after
                        // the duplicate check; surface the existing code.
                        if let Some(existing_code) = self
                            .store
                            .find_code_by_contact(&member.email, &member.phone)
                            .await?
                        {
                            return Err(RegistryError::DuplicateContact { existing_code });
                        }
                        return Err(RegistryError::Storage(err));
                    }
                    None => return Err(RegistryError::Storage(err)),
                },
            }
        }
    }

    /// Look up the full record for an identifier (email or phone) and code
    ///
    /// Zero matches collapse to `InvalidCredential` regardless of whether the
    /// identifier or the code was wrong.
    pub async fn verify(&self, identifier: &str, code: &str) -> Result<Member, RegistryError> {
        self.store
            .find_by_credential(identifier, code)
            .await?
            .ok_or(RegistryError::InvalidCredential)
    }

    /// Apply a credentialed partial update to the owning record
    ///
    /// All validated field changes are applied in one transaction; a failure
    /// on any column leaves the record untouched.
    pub async fn update_member(
        &self,
        identifier: &str,
        code: &str,
        update: &MemberUpdate,
    ) -> Result<(), RegistryError> {
        let member_id = self
            .store
            .resolve_credential(identifier, code)
            .await?
            .ok_or(RegistryError::InvalidCredential)?;

        let mut changes: Vec<(MemberColumn, &str)> = Vec::new();

        // Identity fields: empty means "leave unchanged"
        for (column, value) in [
            (MemberColumn::Name, &update.name),
            (MemberColumn::Email, &update.email),
            (MemberColumn::Phone, &update.phone),
        ] {
            if let Some(value) = value.as_deref() {
                if !value.is_empty() {
                    changes.push((column, value));
                }
            }
        }

        // Descriptive fields: any supplied value applies, "" clears
        for (column, value) in [
            (MemberColumn::Department, &update.department),
            (MemberColumn::RegNumber, &update.reg_number),
            (MemberColumn::Year, &update.year),
        ] {
            if let Some(value) = value.as_deref() {
                changes.push((column, value));
            }
        }

        if changes.is_empty() {
            return Ok(());
        }

        for &(column, value) in &changes {
            if self.contact_in_use(column, value, member_id).await? {
                warn!(
                    "Update for member {} rejected: {} already in use",
                    member_id,
                    column.as_str()
                );
                return Err(RegistryError::ConflictingField {
                    field: column.as_str(),
                });
            }
        }

        let mut tx = self.store.pool().begin().await?;
        for &(column, value) in &changes {
            sqlx::query(column.update_sql())
                .bind(value)
                .bind(member_id)
                .execute(&mut *tx)
                .await
                .map_err(update_violation)?;
        }
        tx.commit().await?;

        info!(
            "Updated member {} ({} field(s))",
            member_id,
            changes.len()
        );
        Ok(())
    }

    /// Apply a single whitelisted column update to a record
    ///
    /// The column name is checked against the whitelist before any store
    /// access; the locator is either a surrogate id or a contact pair, and
    /// must resolve together with the membership code.
    pub async fn update_column(
        &self,
        locator: &MemberLocator,
        code: &str,
        column: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        let column = MemberColumn::parse(column).ok_or_else(|| RegistryError::InvalidColumn {
            column: column.to_string(),
        })?;

        let member_id = match locator {
            MemberLocator::Id(id) => self.store.resolve_by_id(*id, code).await?,
            MemberLocator::Contact { email, phone } => {
                self.store
                    .resolve_by_contact(email.as_deref(), phone.as_deref(), code)
                    .await?
            }
        }
        .ok_or(RegistryError::NotFound)?;

        if self.contact_in_use(column, value, member_id).await? {
            return Err(RegistryError::ConflictingField {
                field: column.as_str(),
            });
        }

        sqlx::query(column.update_sql())
            .bind(value)
            .bind(member_id)
            .execute(self.store.pool())
            .await
            .map_err(update_violation)?;

        info!(
            "Updated column {} for member {}",
            column.as_str(),
            member_id
        );
        Ok(())
    }

    /// Count all registered members
    pub async fn count_members(&self) -> Result<i64, RegistryError> {
        Ok(self.store.count_members().await?)
    }

    /// List all members ordered by display name
    pub async fn list_members(&self) -> Result<Vec<Member>, RegistryError> {
        Ok(self.store.list_members().await?)
    }

    /// Check whether a non-empty contact value is held by another record
    async fn contact_in_use(
        &self,
        column: MemberColumn,
        value: &str,
        exclude_id: i64,
    ) -> Result<bool, RegistryError> {
        let Some(sql) = column.conflict_sql() else {
            return Ok(false);
        };
        if value.is_empty() {
            return Ok(false);
        }
        let other: Option<i64> = sqlx::query_scalar(sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_optional(self.store.pool())
            .await?;
        Ok(other.is_some())
    }
}
