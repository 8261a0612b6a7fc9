/// Capability checks for community-service
///
/// Every mutating operation runs exactly one of these predicates at entry
/// instead of scattering role checks through the handlers.
use crate::error::{AppError, Result};
use crate::models::AuthUser;
use uuid::Uuid;

/// Admin capability: moderation reviews and admin listings.
pub fn require_admin(caller: &AuthUser) -> Result<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not authorized to perform this action".to_string(),
        ))
    }
}

/// Deletion capability: the author, or any admin.
pub fn can_delete(caller: &AuthUser, author_id: Uuid) -> Result<()> {
    if caller.id == author_id || caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not authorized to delete this resource".to_string(),
        ))
    }
}

/// Edit capability: the author only.
pub fn require_author(caller: &AuthUser, author_id: Uuid) -> Result<()> {
    if caller.id == author_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not authorized to modify this resource".to_string(),
        ))
    }
}

/// Edit capability for events: the organizer, or any admin.
pub fn can_manage_event(caller: &AuthUser, author_id: Uuid) -> Result<()> {
    if caller.id == author_id || caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you are not authorized to manage this event".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn member(id: Uuid) -> AuthUser {
        AuthUser {
            id,
            role: Role::Member,
        }
    }

    fn admin(id: Uuid) -> AuthUser {
        AuthUser {
            id,
            role: Role::Admin,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&admin(Uuid::new_v4())).is_ok());
        assert!(matches!(
            require_admin(&member(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_can_delete_author_or_admin() {
        let author = Uuid::new_v4();
        assert!(can_delete(&member(author), author).is_ok());
        assert!(can_delete(&admin(Uuid::new_v4()), author).is_ok());
        assert!(matches!(
            can_delete(&member(Uuid::new_v4()), author),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_require_author_rejects_admin_override() {
        let author = Uuid::new_v4();
        assert!(require_author(&member(author), author).is_ok());
        assert!(require_author(&admin(Uuid::new_v4()), author).is_err());
    }
}
