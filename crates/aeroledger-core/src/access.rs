//! Access control guards
//!
//! Pure predicates evaluated before the mutating body of every operation.
//! A guard either passes or rejects with `LedgerError::Unauthorized` carrying
//! a stable reason string. Guards never mutate.

use tracing::warn;

use crate::error::{LedgerError, Result};
use crate::types::{Address, Part, Role, Stakeholder};

pub const ADMIN_ONLY: &str = "only admin can perform this action";
pub const OWNER_ONLY: &str = "only part owner can perform this action";

/// Reason string produced when `role_only` rejects a caller
pub fn role_only_reason(role: Role) -> String {
    format!("only {} can perform this action", role.plural())
}

/// Caller must be the ledger administrator
pub fn admin_only(admin: &Address, caller: &Address) -> Result<()> {
    if admin == caller {
        Ok(())
    } else {
        warn!(caller = %caller, "Rejected non-admin caller");
        Err(LedgerError::Unauthorized(ADMIN_ONLY.into()))
    }
}

/// Caller must be a registered, active stakeholder holding `role`
///
/// `stakeholder` is the caller's registry entry, if any.
pub fn role_only<'a>(
    stakeholder: Option<&'a Stakeholder>,
    caller: &Address,
    role: Role,
) -> Result<&'a Stakeholder> {
    match stakeholder {
        Some(s) if s.active && s.role == role && s.identity == *caller => Ok(s),
        _ => {
            warn!(caller = %caller, required = %role, "Rejected caller lacking role");
            Err(LedgerError::Unauthorized(role_only_reason(role)))
        }
    }
}

/// Caller must be the part's current owner
pub fn owner_only(part: &Part, caller: &Address) -> Result<()> {
    if part.current_owner == *caller {
        Ok(())
    } else {
        warn!(
            part_id = %part.id,
            caller = %caller,
            owner = %part.current_owner,
            "Rejected non-owner caller"
        );
        Err(LedgerError::Unauthorized(OWNER_ONLY.into()))
    }
}

/// Whether a registry entry may receive custody of a part
pub fn is_active(stakeholder: Option<&Stakeholder>) -> bool {
    stakeholder.map(|s| s.active).unwrap_or(false)
}
