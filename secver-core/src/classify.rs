use crate::client::StoreError;

/// How a store failure maps onto the resolver's outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The store reported the not-found code.
    Missing,
    /// The store rejected the request because the secret was deleted.
    Deleted,
    Other,
}

impl FailureClass {
    pub fn is_not_found(self) -> bool {
        matches!(self, FailureClass::Missing | FailureClass::Deleted)
    }
}

pub fn classify(err: &StoreError) -> FailureClass {
    match err.code() {
        Some(StoreError::RESOURCE_NOT_FOUND) => FailureClass::Missing,
        // Deleted secrets have no dedicated code. The only signal is the
        // English message text of an invalid-request error, so any rewording
        // on the store side turns these into `Other`.
        Some(StoreError::INVALID_REQUEST)
            if err.message.contains(StoreError::DELETED_SECRET_MESSAGE) =>
        {
            FailureClass::Deleted
        }
        _ => FailureClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_is_missing() {
        let err = StoreError::not_found("Secrets Manager can't find the specified secret.");
        assert_eq!(classify(&err), FailureClass::Missing);
        assert!(classify(&err).is_not_found());
    }

    #[test]
    fn deleted_message_on_invalid_request_is_deleted() {
        assert_eq!(classify(&StoreError::deleted()), FailureClass::Deleted);
    }

    #[test]
    fn invalid_request_with_other_message_is_other() {
        let err = StoreError::new(StoreError::INVALID_REQUEST, "You can't rotate this secret");
        assert_eq!(classify(&err), FailureClass::Other);
        assert!(!classify(&err).is_not_found());
    }

    #[test]
    fn deleted_message_under_another_code_is_other() {
        let err = StoreError::new(
            "AccessDeniedException",
            StoreError::DELETED_SECRET_MESSAGE,
        );
        assert_eq!(classify(&err), FailureClass::Other);
        assert_eq!(classify(&StoreError::other("connection reset")), FailureClass::Other);
    }
}
