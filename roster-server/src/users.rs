//! Login accounts

/// An account allowed to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    password: String,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Fixed in-memory account list.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The single demo account, `test` / `test123`.
    pub fn demo() -> Self {
        Self::new(vec![User::new(1, "test", "test123")])
    }

    /// Returns the user whose username and password both match.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_account() {
        let users = UserDirectory::demo();
        assert_eq!(users.authenticate("test", "test123").map(|u| u.id), Some(1));
        assert!(users.authenticate("test", "wrong").is_none());
        assert!(users.authenticate("TEST", "test123").is_none());
    }
}
