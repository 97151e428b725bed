//! Who is using the session.
//!
//! The engine never authenticates anyone. It asks an [`IdentityProvider`]
//! for the member bound to the session and treats `None` as signed out.

use bairro_model::{User, UserId, ValidationErrors};
use tracing::info;

/// Supplies the member bound to the session, if any.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// A provider nobody is ever signed in to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// In-memory sign-in for demos and tests.
///
/// Accepts any well-formed email; there are no passwords.
#[derive(Debug, Clone, Default)]
pub struct LocalIdentity {
    current: Option<User>,
}

impl LocalIdentity {
    /// A provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with `user` already signed in.
    pub fn signed_in(user: User) -> Self {
        Self {
            current: Some(user),
        }
    }

    /// Sign in with an email; the display name is the part before `@`.
    pub fn sign_in(&mut self, email: &str) -> Result<User, ValidationErrors> {
        let email = email.trim();
        check_email(email).into_result()?;

        let name = email.split('@').next().unwrap_or(email).to_string();
        Ok(self.bind(name, email))
    }

    /// Register a new member and sign them in.
    pub fn register(&mut self, name: &str, email: &str) -> Result<User, ValidationErrors> {
        let name = name.trim();
        let email = email.trim();

        let mut errors = check_email(email);
        if name.is_empty() {
            errors.push("name", "name is required");
        } else if name.chars().count() < 2 {
            errors.push("name", "name must have at least 2 characters");
        }
        errors.into_result()?;

        Ok(self.bind(name.to_string(), email))
    }

    /// Unbind the current member, returning who it was.
    pub fn sign_out(&mut self) -> Option<User> {
        let previous = self.current.take();
        if let Some(user) = &previous {
            info!(user_id = %user.id, "Signed out");
        }
        previous
    }

    fn bind(&mut self, name: String, email: &str) -> User {
        let user = User {
            id: UserId::new(email.to_lowercase()),
            name,
            email: email.to_string(),
        };
        info!(user_id = %user.id, "Signed in");
        self.current = Some(user.clone());
        user
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<User> {
        self.current.clone()
    }
}

/// Loose `local@domain.tld` shape check.
fn check_email(email: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if email.is_empty() {
        errors.push("email", "email is required");
        return errors;
    }

    let well_formed = !email.chars().any(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };

    if !well_formed {
        errors.push("email", "email is invalid");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_derives_name() {
        let mut identity = LocalIdentity::new();
        assert!(!identity.is_authenticated());

        let user = identity.sign_in("ana.costa@example.com").unwrap();
        assert_eq!(user.name, "ana.costa");
        assert_eq!(identity.current_user(), Some(user));
    }

    #[test]
    fn test_same_email_same_member() {
        let mut identity = LocalIdentity::new();
        let first = identity.sign_in("Ana@Example.com").unwrap();
        identity.sign_out();
        let second = identity.sign_in("ana@example.com").unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_rejects_malformed_email() {
        let mut identity = LocalIdentity::new();
        for email in ["", "ana", "ana@", "@example.com", "ana@example", "a na@example.com"] {
            assert!(identity.sign_in(email).is_err(), "accepted {email:?}");
        }
        assert!(identity.current_user().is_none());
    }

    #[test]
    fn test_register_checks_name() {
        let mut identity = LocalIdentity::new();
        let errors = identity.register("A", "a@example.com").unwrap_err();
        assert_eq!(
            errors.message_for("name"),
            Some("name must have at least 2 characters")
        );

        let user = identity.register("Carlos Santos", "carlos@example.com").unwrap();
        assert_eq!(user.name, "Carlos Santos");
    }

    #[test]
    fn test_anonymous_never_authenticated() {
        assert!(Anonymous.current_user().is_none());
        assert!(!Anonymous.is_authenticated());
    }
}
