//! Mentor assignment and mentorship status transitions.
//!
//! ```text
//! active -> completed | terminated
//! completed, terminated: terminal (for every role)
//! ```

use crate::access::{ensure_can_mutate, Action, Resource};
use crate::error::CoreError;
use crate::product::ProductState;
use crate::roles::{Actor, Role};
use crate::status::MentorshipStatus;
use crate::types::DbId;

/// Maximum length of free-form mentorship notes.
pub const MAX_NOTES_LENGTH: usize = 10_000;

impl MentorshipStatus {
    /// Statuses reachable in one step from `self`, excluding `self`.
    pub fn next_statuses(self) -> &'static [MentorshipStatus] {
        match self {
            MentorshipStatus::Active => {
                &[MentorshipStatus::Completed, MentorshipStatus::Terminated]
            }
            MentorshipStatus::Completed | MentorshipStatus::Terminated => &[],
        }
    }

    pub fn can_transition_to(self, next: MentorshipStatus) -> bool {
        self == next || self.next_statuses().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }
}

/// A user reference carrying just enough to check the mentor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRef {
    pub id: DbId,
    pub role: Role,
}

/// Snapshot of the mentorship fields the rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentorshipState {
    pub id: DbId,
    pub mentor_id: DbId,
    pub product_owner_id: DbId,
    pub status: MentorshipStatus,
}

impl MentorshipState {
    pub fn resource(&self) -> Resource {
        Resource::Mentorship {
            id: self.id,
            mentor_id: self.mentor_id,
            product_owner_id: self.product_owner_id,
        }
    }
}

fn ensure_mentor(user: &UserRef) -> Result<(), CoreError> {
    if user.role == Role::Mentor {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "User {} is not a mentor",
            user.id
        )))
    }
}

fn validate_notes(notes: Option<&str>) -> Result<(), CoreError> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_LENGTH => Err(CoreError::Validation(format!(
            "notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Decide whether `actor` may assign `mentor` to `product`.
///
/// `existing` is the id of the product's current mentorship, if any. Checks,
/// in order: admin role, mentor role, notes length, no existing mentorship.
pub fn plan_assignment(
    actor: &Actor,
    product: &ProductState,
    mentor: &UserRef,
    notes: Option<&str>,
    existing: Option<DbId>,
) -> Result<(), CoreError> {
    ensure_can_mutate(actor, &product.resource(), Action::AssignMentor)?;
    ensure_mentor(mentor)?;
    validate_notes(notes)?;

    if let Some(mentorship_id) = existing {
        return Err(CoreError::Conflict(format!(
            "Product {} already has mentorship {mentorship_id}",
            product.id
        )));
    }
    Ok(())
}

/// A requested mentorship update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorshipUpdate {
    pub status: Option<MentorshipStatus>,
    pub notes: Option<String>,
    pub mentor: Option<UserRef>,
}

/// The validated subset of a [`MentorshipUpdate`] that actually needs writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorshipChange {
    pub status: Option<MentorshipStatus>,
    pub notes: Option<String>,
    pub mentor_id: Option<DbId>,
}

impl MentorshipChange {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none() && self.mentor_id.is_none()
    }
}

/// Decide whether `actor` may apply `update` to `mentorship`.
///
/// The owning mentor may change status and notes; admins may additionally
/// reassign the mentor. Terminal statuses cannot be left.
pub fn plan_update(
    actor: &Actor,
    mentorship: &MentorshipState,
    update: MentorshipUpdate,
) -> Result<MentorshipChange, CoreError> {
    let resource = mentorship.resource();
    ensure_can_mutate(actor, &resource, Action::UpdateMentorship)?;

    let mentor_id = match update.mentor {
        Some(mentor) => {
            ensure_can_mutate(actor, &resource, Action::ReassignMentor)?;
            ensure_mentor(&mentor)?;
            (mentor.id != mentorship.mentor_id).then_some(mentor.id)
        }
        None => None,
    };

    validate_notes(update.notes.as_deref())?;

    let status = match update.status {
        Some(next) if !mentorship.status.can_transition_to(next) => {
            return Err(CoreError::Conflict(format!(
                "Mentorship {} cannot move from {} to {}",
                mentorship.id, mentorship.status, next
            )));
        }
        Some(next) if next != mentorship.status => Some(next),
        _ => None,
    };

    if mentor_id.is_some() && mentorship.status.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Mentorship {} is {} and cannot be reassigned",
            mentorship.id, mentorship.status
        )));
    }

    Ok(MentorshipChange {
        status,
        notes: update.notes,
        mentor_id,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::status::ProductStatus;

    const ADMIN: Actor = Actor { id: 1, role: Role::Admin };
    const MENTOR: Actor = Actor { id: 2, role: Role::Mentor };
    const OTHER_MENTOR: Actor = Actor { id: 3, role: Role::Mentor };
    const OWNER: Actor = Actor { id: 4, role: Role::Entrepreneur };
    const STRANGER: Actor = Actor { id: 5, role: Role::Entrepreneur };

    fn product() -> ProductState {
        ProductState {
            id: 10,
            owner_id: OWNER.id,
            status: ProductStatus::Approved,
            funding_amount: None,
        }
    }

    fn mentor_ref(actor: Actor) -> UserRef {
        UserRef {
            id: actor.id,
            role: actor.role,
        }
    }

    fn mentorship(status: MentorshipStatus) -> MentorshipState {
        MentorshipState {
            id: 20,
            mentor_id: MENTOR.id,
            product_owner_id: OWNER.id,
            status,
        }
    }

    fn status_update(status: MentorshipStatus) -> MentorshipUpdate {
        MentorshipUpdate {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn transition_table() {
        use MentorshipStatus::*;
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Terminated));
        assert!(!Completed.can_transition_to(Active));
        assert!(!Terminated.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Terminated));
        assert!(Completed.is_terminal());
        assert!(!Active.is_terminal());
    }

    #[test]
    fn admin_assigns_mentor() {
        assert!(plan_assignment(&ADMIN, &product(), &mentor_ref(MENTOR), Some("kickoff"), None).is_ok());
    }

    #[test]
    fn non_admin_cannot_assign() {
        for actor in [MENTOR, OWNER] {
            assert_matches!(
                plan_assignment(&actor, &product(), &mentor_ref(MENTOR), None, None),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn assignee_must_be_mentor() {
        assert_matches!(
            plan_assignment(&ADMIN, &product(), &mentor_ref(OWNER), None, None),
            Err(CoreError::Validation(msg)) if msg.contains("not a mentor")
        );
    }

    #[test]
    fn second_assignment_conflicts() {
        for mentor in [MENTOR, OTHER_MENTOR] {
            assert_matches!(
                plan_assignment(&ADMIN, &product(), &mentor_ref(mentor), Some("again"), Some(20)),
                Err(CoreError::Conflict(_))
            );
        }
    }

    #[test]
    fn owning_mentor_and_admin_may_update_status() {
        for actor in [MENTOR, ADMIN] {
            let change = plan_update(
                &actor,
                &mentorship(MentorshipStatus::Active),
                status_update(MentorshipStatus::Completed),
            )
            .unwrap();
            assert_eq!(change.status, Some(MentorshipStatus::Completed));
        }
    }

    #[test]
    fn other_actors_may_not_update() {
        let m = mentorship(MentorshipStatus::Active);
        assert_matches!(
            plan_update(&OTHER_MENTOR, &m, status_update(MentorshipStatus::Completed)),
            Err(CoreError::NotFound { entity: "Mentorship", id: 20 })
        );
        for actor in [OWNER, STRANGER] {
            assert_matches!(
                plan_update(&actor, &m, status_update(MentorshipStatus::Completed)),
                Err(CoreError::Forbidden(_))
            );
        }
    }

    #[test]
    fn terminal_status_cannot_be_left() {
        for actor in [MENTOR, ADMIN] {
            assert_matches!(
                plan_update(
                    &actor,
                    &mentorship(MentorshipStatus::Terminated),
                    status_update(MentorshipStatus::Active)
                ),
                Err(CoreError::Conflict(_))
            );
        }
    }

    #[test]
    fn notes_only_update_on_terminal_mentorship() {
        let change = plan_update(
            &MENTOR,
            &mentorship(MentorshipStatus::Completed),
            MentorshipUpdate {
                status: Some(MentorshipStatus::Completed),
                notes: Some("Wrap-up summary".to_string()),
                mentor: None,
            },
        )
        .unwrap();
        assert_eq!(change.status, None);
        assert_eq!(change.notes.as_deref(), Some("Wrap-up summary"));
    }

    #[test]
    fn only_admin_reassigns_mentor() {
        let update = MentorshipUpdate {
            mentor: Some(mentor_ref(OTHER_MENTOR)),
            ..Default::default()
        };
        assert_matches!(
            plan_update(&MENTOR, &mentorship(MentorshipStatus::Active), update.clone()),
            Err(CoreError::Forbidden(_))
        );
        let change = plan_update(&ADMIN, &mentorship(MentorshipStatus::Active), update).unwrap();
        assert_eq!(change.mentor_id, Some(OTHER_MENTOR.id));
    }

    #[test]
    fn reassignment_target_must_be_mentor() {
        let update = MentorshipUpdate {
            mentor: Some(mentor_ref(OWNER)),
            ..Default::default()
        };
        assert_matches!(
            plan_update(&ADMIN, &mentorship(MentorshipStatus::Active), update),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn reassigning_same_mentor_is_noop() {
        let update = MentorshipUpdate {
            mentor: Some(mentor_ref(MENTOR)),
            ..Default::default()
        };
        let change = plan_update(&ADMIN, &mentorship(MentorshipStatus::Active), update).unwrap();
        assert!(change.is_empty());
    }

    #[test]
    fn overlong_notes_rejected() {
        let update = MentorshipUpdate {
            notes: Some("n".repeat(MAX_NOTES_LENGTH + 1)),
            ..Default::default()
        };
        assert_matches!(
            plan_update(&MENTOR, &mentorship(MentorshipStatus::Active), update),
            Err(CoreError::Validation(_))
        );
    }
}
