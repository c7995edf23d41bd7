//! # Registry Errors
//!
//! Every rejected call maps to exactly one [`RegistryError`]. Rejections
//! happen before any state is touched, so the registry is left exactly as
//! it was before the call.
//!
//! The `Display` text of each variant is the message callers observe and
//! may match on; the texts are stable.

use thiserror::Error;

/// The owner-gated operation a caller attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerAction {
    /// Extending a record's expiry.
    Renew,
    /// Replacing a record's resolver.
    ChangeResolve,
    /// Replacing a record's personal-info fields.
    ChangePersonalInfo,
}

impl OwnerAction {
    /// The rejection message for a non-owner attempting this action.
    pub fn rejection_message(&self) -> &'static str {
        match self {
            Self::Renew => "Error: Only the domain owner can renew.",
            Self::ChangeResolve => "Only the owner of the domain can change the resolve address",
            Self::ChangePersonalInfo => {
                "Only the owner of the domain can change the personal information"
            }
        }
    }
}

impl std::fmt::Display for OwnerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rejection_message())
    }
}

/// Failure reported by the value-transfer collaborator during withdrawal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// The transfer was refused by the host environment.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Rejection of a registry operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An administrator-only operation was called by someone else.
    #[error("Ownable: caller is not the owner")]
    NotAdministrator,

    /// Registration attempted while the registry is paused.
    #[error("Error: Contract is currently paused.")]
    Paused,

    /// Fewer than one year requested.
    #[error("Error: Invalid registration year, year must be greater than or equal to 1.")]
    InvalidDuration,

    /// The domain type is not in the allow-set.
    #[error("Error: Domain type is not allowed.")]
    DomainNotAllowed,

    /// An active record already holds the fully-qualified name.
    #[error("Error: Domain is not available for registration.")]
    NameUnavailable,

    /// The attached payment is below the tiered price times years.
    #[error("Error: Not enough value sent with the transaction.")]
    InsufficientPayment,

    /// Resolution of a name with no record or an expired one.
    #[error("Error: Domain is expired or not registered.")]
    ExpiredOrUnregistered,

    /// An owner-gated operation was called by someone other than the stored owner.
    #[error("{0}")]
    OwnerOnly(OwnerAction),

    /// The value-transfer collaborator refused the withdrawal.
    #[error("payout failed: {0}")]
    Payout(#[from] PayoutError),

    /// An expiry, balance, or counter computation overflowed.
    #[error("arithmetic overflow: {0}")]
    Arithmetic(&'static str),
}

impl RegistryError {
    /// Stable machine-readable code for this rejection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAdministrator => "NOT_ADMINISTRATOR",
            Self::Paused => "PAUSED",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::DomainNotAllowed => "DOMAIN_NOT_ALLOWED",
            Self::NameUnavailable => "NAME_UNAVAILABLE",
            Self::InsufficientPayment => "INSUFFICIENT_PAYMENT",
            Self::ExpiredOrUnregistered => "EXPIRED_OR_UNREGISTERED",
            Self::OwnerOnly(_) => "OWNER_ONLY",
            Self::Payout(_) => "PAYOUT_FAILED",
            Self::Arithmetic(_) => "ARITHMETIC_OVERFLOW",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            RegistryError::NotAdministrator.to_string(),
            "Ownable: caller is not the owner"
        );
        assert_eq!(
            RegistryError::Paused.to_string(),
            "Error: Contract is currently paused."
        );
        assert_eq!(
            RegistryError::InvalidDuration.to_string(),
            "Error: Invalid registration year, year must be greater than or equal to 1."
        );
        assert_eq!(
            RegistryError::DomainNotAllowed.to_string(),
            "Error: Domain type is not allowed."
        );
        assert_eq!(
            RegistryError::NameUnavailable.to_string(),
            "Error: Domain is not available for registration."
        );
        assert_eq!(
            RegistryError::InsufficientPayment.to_string(),
            "Error: Not enough value sent with the transaction."
        );
    }

    #[test]
    fn owner_only_messages_are_operation_specific() {
        assert_eq!(
            RegistryError::OwnerOnly(OwnerAction::ChangeResolve).to_string(),
            "Only the owner of the domain can change the resolve address"
        );
        assert_eq!(
            RegistryError::OwnerOnly(OwnerAction::ChangePersonalInfo).to_string(),
            "Only the owner of the domain can change the personal information"
        );
        assert_eq!(
            RegistryError::OwnerOnly(OwnerAction::Renew).to_string(),
            "Error: Only the domain owner can renew."
        );
    }

    #[test]
    fn payout_error_wraps() {
        let err: RegistryError = PayoutError::Rejected("bank offline".into()).into();
        assert_eq!(err.to_string(), "payout failed: transfer rejected: bank offline");
        assert_eq!(err.kind(), "PAYOUT_FAILED");
    }

    #[test]
    fn kinds_are_distinct() {
        let all = [
            RegistryError::NotAdministrator,
            RegistryError::Paused,
            RegistryError::InvalidDuration,
            RegistryError::DomainNotAllowed,
            RegistryError::NameUnavailable,
            RegistryError::InsufficientPayment,
            RegistryError::ExpiredOrUnregistered,
            RegistryError::OwnerOnly(OwnerAction::Renew),
            RegistryError::Arithmetic("expiry"),
        ];
        let kinds: std::collections::HashSet<_> = all.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), all.len());
    }
}
