//! Vault roles: owner, manager and investor.
//!
//! The owner is fixed at construction. Manager and investor are assigned by
//! the owner and take effect for the very next dispatch.

use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role a caller may be required to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Manager,
    Investor,
    /// Administrator of an allow-list or registry.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Manager => write!(f, "manager"),
            Role::Investor => write!(f, "investor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The caller lacks the role an operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("caller {caller} is not the {role}")]
pub struct AccessError {
    pub role: Role,
    pub caller: Address,
}

/// Require `caller` to be exactly `holder`.
pub fn require(role: Role, holder: Option<Address>, caller: Address) -> Result<(), AccessError> {
    match holder {
        Some(holder) if holder == caller => Ok(()),
        _ => Err(AccessError { role, caller }),
    }
}

/// The three independent role holders of one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSet {
    owner: Address,
    manager: Option<Address>,
    investor: Option<Address>,
    allow_manager_signature: bool,
}

impl RoleSet {
    /// A role set with only the owner assigned.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            manager: None,
            investor: None,
            allow_manager_signature: false,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn manager(&self) -> Option<Address> {
        self.manager
    }

    pub fn investor(&self) -> Option<Address> {
        self.investor
    }

    /// Whether signatures by the manager count as vault signatures.
    pub fn allow_manager_signature(&self) -> bool {
        self.allow_manager_signature
    }

    pub fn require_owner(&self, caller: Address) -> Result<(), AccessError> {
        require(Role::Owner, Some(self.owner), caller)
    }

    pub fn require_manager(&self, caller: Address) -> Result<(), AccessError> {
        require(Role::Manager, self.manager, caller)
    }

    pub fn require_investor(&self, caller: Address) -> Result<(), AccessError> {
        require(Role::Investor, self.investor, caller)
    }

    /// Replace the manager. Owner only.
    pub fn assign_manager(&mut self, caller: Address, manager: Address) -> Result<(), AccessError> {
        self.require_owner(caller)?;
        self.manager = Some(manager);
        Ok(())
    }

    /// Replace the investor. Owner only.
    pub fn assign_investor(
        &mut self,
        caller: Address,
        investor: Address,
    ) -> Result<(), AccessError> {
        self.require_owner(caller)?;
        self.investor = Some(investor);
        Ok(())
    }

    /// Toggle whether manager signatures are accepted. Owner only.
    pub fn set_allow_manager_signature(
        &mut self,
        caller: Address,
        allow: bool,
    ) -> Result<(), AccessError> {
        self.require_owner(caller)?;
        self.allow_manager_signature = allow;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const OWNER: Address = address!("00000000000000000000000000000000000000a1");
    const MANAGER: Address = address!("00000000000000000000000000000000000000b2");
    const STRANGER: Address = address!("00000000000000000000000000000000000000c3");

    #[test]
    fn fresh_roles_have_only_owner() {
        let roles = RoleSet::new(OWNER);
        assert_eq!(roles.owner(), OWNER);
        assert!(roles.manager().is_none());
        assert!(roles.investor().is_none());
        assert!(!roles.allow_manager_signature());
        assert!(roles.require_owner(OWNER).is_ok());
    }

    #[test]
    fn unassigned_manager_rejects_everyone() {
        let roles = RoleSet::new(OWNER);
        let err = roles.require_manager(OWNER).unwrap_err();
        assert_eq!(err.role, Role::Manager);
        assert_eq!(err.caller, OWNER);
    }

    #[test]
    fn owner_assigns_manager() {
        let mut roles = RoleSet::new(OWNER);
        roles.assign_manager(OWNER, MANAGER).unwrap();
        assert!(roles.require_manager(MANAGER).is_ok());
        assert!(roles.require_manager(STRANGER).is_err());
    }

    #[test]
    fn non_owner_cannot_assign() {
        let mut roles = RoleSet::new(OWNER);
        let err = roles.assign_manager(STRANGER, STRANGER).unwrap_err();
        assert_eq!(err.role, Role::Owner);
        assert!(roles.assign_investor(MANAGER, MANAGER).is_err());
        assert!(roles.set_allow_manager_signature(STRANGER, true).is_err());
        assert!(roles.manager().is_none());
    }

    #[test]
    fn reassignment_takes_effect_immediately() {
        let mut roles = RoleSet::new(OWNER);
        roles.assign_manager(OWNER, MANAGER).unwrap();
        roles.assign_manager(OWNER, STRANGER).unwrap();
        assert!(roles.require_manager(MANAGER).is_err());
        assert!(roles.require_manager(STRANGER).is_ok());
    }

    #[test]
    fn error_message_names_role() {
        let err = AccessError {
            role: Role::Investor,
            caller: STRANGER,
        };
        assert!(err.to_string().contains("investor"));
    }
}
