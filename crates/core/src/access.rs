//! Visibility and mutation predicates.
//!
//! [`can_view`] and [`can_mutate`] are pure functions of the acting identity
//! and a snapshot of the resource's ownership fields. A denial carries a
//! [`Denial`] reason so the HTTP layer can choose between 401, 403 and 404.
//!
//! List endpoints use [`product_scope`] and [`mentorship_scope`], which are
//! derived from the same rules so a list never contains a row that
//! [`can_view`] would refuse.

use crate::error::CoreError;
use crate::roles::{Actor, Role};
use crate::status::ProductStatus;
use crate::types::DbId;

/// The ownership facts needed to decide access to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product {
        id: DbId,
        owner_id: DbId,
        status: ProductStatus,
    },
    Mentorship {
        id: DbId,
        mentor_id: DbId,
        product_owner_id: DbId,
    },
    User {
        id: DbId,
    },
}

impl Resource {
    /// Entity name used in not-found messages.
    pub fn entity(&self) -> &'static str {
        match self {
            Resource::Product { .. } => "Product",
            Resource::Mentorship { .. } => "Mentorship",
            Resource::User { .. } => "User",
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Resource::Product { id, .. }
            | Resource::Mentorship { id, .. }
            | Resource::User { id } => *id,
        }
    }
}

/// A state-changing operation on a [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move a product to the given status.
    ChangeProductStatus(ProductStatus),
    /// Edit a product's title, description, media or category.
    EditProduct,
    /// Assign a mentor to a product.
    AssignMentor,
    /// Change a mentorship's status or notes.
    UpdateMentorship,
    /// Replace the mentor on an existing mentorship.
    ReassignMentor,
    /// Edit a user's profile.
    EditProfile,
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No identity was presented.
    Unauthenticated,
    /// The actor can see the resource but lacks the role or ownership to act.
    Forbidden,
    /// The resource is not visible to the actor at all.
    NotVisible,
}

impl Denial {
    /// Convert into the domain error for `resource`.
    ///
    /// `NotVisible` deliberately reads as not-found so hidden rows are
    /// indistinguishable from missing ones.
    pub fn into_error(self, resource: &Resource) -> CoreError {
        match self {
            Denial::Unauthenticated => CoreError::Unauthorized("Authentication required".into()),
            Denial::Forbidden => CoreError::Forbidden(format!(
                "Not permitted to modify {} {}",
                resource.entity(),
                resource.id()
            )),
            Denial::NotVisible => CoreError::NotFound {
                entity: resource.entity(),
                id: resource.id(),
            },
        }
    }
}

/// Outcome of an access check.
pub type Decision = Result<(), Denial>;

/// Decide whether `actor` may read `resource`.
///
/// - Admins see everything.
/// - Mentors see every product and the mentorships assigned to them.
/// - Entrepreneurs see their own products and the mentorships on them.
/// - Users see their own profile.
pub fn can_view(actor: Option<&Actor>, resource: &Resource) -> Decision {
    let actor = actor.ok_or(Denial::Unauthenticated)?;

    let visible = match (actor.role, resource) {
        (Role::Admin, _) => true,
        (Role::Mentor, Resource::Product { .. }) => true,
        (Role::Entrepreneur, Resource::Product { owner_id, .. }) => *owner_id == actor.id,
        (Role::Mentor, Resource::Mentorship { mentor_id, .. }) => *mentor_id == actor.id,
        (Role::Entrepreneur, Resource::Mentorship { product_owner_id, .. }) => {
            *product_owner_id == actor.id
        }
        (_, Resource::User { id }) => *id == actor.id,
    };

    if visible {
        Ok(())
    } else {
        Err(Denial::NotVisible)
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
///
/// Admins may perform every action. For everyone else:
///
/// | Action                         | Allowed for                                     |
/// |--------------------------------|-------------------------------------------------|
/// | `ChangeProductStatus(pending)` | owner, while the product is still pending (no-op) |
/// | `ChangeProductStatus(other)`   | nobody                                          |
/// | `EditProduct`                  | owner, while the product is pending             |
/// | `AssignMentor`                 | nobody                                          |
/// | `UpdateMentorship`             | the assigned mentor                             |
/// | `ReassignMentor`               | nobody                                          |
/// | `EditProfile`                  | the user themself                               |
///
/// A mentor acting on someone else's mentorship gets `NotVisible`, as does
/// an entrepreneur touching another owner's product in the owner-only cases.
pub fn can_mutate(actor: Option<&Actor>, resource: &Resource, action: Action) -> Decision {
    let actor = actor.ok_or(Denial::Unauthenticated)?;
    if actor.is_admin() {
        return Ok(());
    }

    match (action, resource) {
        (Action::ChangeProductStatus(to), Resource::Product { owner_id, status, .. }) => {
            if to != ProductStatus::Pending {
                return Err(Denial::Forbidden);
            }
            can_view(Some(actor), resource)?;
            owner_while_pending(actor, *owner_id, *status)
        }
        (Action::EditProduct, Resource::Product { owner_id, status, .. }) => {
            can_view(Some(actor), resource)?;
            owner_while_pending(actor, *owner_id, *status)
        }
        (Action::UpdateMentorship, Resource::Mentorship { .. }) => match actor.role {
            Role::Mentor => can_view(Some(actor), resource),
            _ => Err(Denial::Forbidden),
        },
        (Action::EditProfile, Resource::User { id }) if *id == actor.id => Ok(()),
        _ => Err(Denial::Forbidden),
    }
}

fn owner_while_pending(actor: &Actor, owner_id: DbId, status: ProductStatus) -> Decision {
    if actor.id == owner_id && status == ProductStatus::Pending {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Convenience wrapper: run [`can_view`] and convert a denial into a [`CoreError`].
pub fn ensure_can_view(actor: &Actor, resource: &Resource) -> Result<(), CoreError> {
    can_view(Some(actor), resource).map_err(|d| d.into_error(resource))
}

/// Convenience wrapper: run [`can_mutate`] and convert a denial into a [`CoreError`].
pub fn ensure_can_mutate(
    actor: &Actor,
    resource: &Resource,
    action: Action,
) -> Result<(), CoreError> {
    can_mutate(Some(actor), resource, action).map_err(|d| d.into_error(resource))
}

/// Which products an actor may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    All,
    OwnedBy(DbId),
}

impl ProductScope {
    /// Owner filter to apply in a query, if any.
    pub fn owner_id(self) -> Option<DbId> {
        match self {
            ProductScope::All => None,
            ProductScope::OwnedBy(id) => Some(id),
        }
    }
}

/// Which mentorships an actor may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentorshipScope {
    All,
    MentoredBy(DbId),
    ProductsOwnedBy(DbId),
}

pub fn product_scope(actor: &Actor) -> ProductScope {
    match actor.role {
        Role::Admin | Role::Mentor => ProductScope::All,
        Role::Entrepreneur => ProductScope::OwnedBy(actor.id),
    }
}

pub fn mentorship_scope(actor: &Actor) -> MentorshipScope {
    match actor.role {
        Role::Admin => MentorshipScope::All,
        Role::Mentor => MentorshipScope::MentoredBy(actor.id),
        Role::Entrepreneur => MentorshipScope::ProductsOwnedBy(actor.id),
    }
}
