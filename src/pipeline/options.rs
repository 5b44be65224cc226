/// What a route asks of the pipeline before its handler runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Open one transaction for the request and commit or roll it back at the end
    pub use_db: bool,

    /// Run the auth gate; implies `use_db`
    pub use_auth: bool,

    /// Additionally require the resolved user to be an admin
    pub use_admin: bool,
}

impl RouteOptions {
    /// No transaction, no gate
    pub const fn bare() -> Self {
        Self {
            use_db: false,
            use_auth: false,
            use_admin: false,
        }
    }

    /// Transaction only
    pub const fn db() -> Self {
        Self {
            use_db: true,
            use_auth: false,
            use_admin: false,
        }
    }

    /// Transaction plus any authenticated user
    pub const fn user() -> Self {
        Self {
            use_db: true,
            use_auth: true,
            use_admin: false,
        }
    }

    /// Transaction plus an authenticated admin
    pub const fn admin() -> Self {
        Self {
            use_db: true,
            use_auth: true,
            use_admin: true,
        }
    }

    pub(crate) fn needs_gate(&self) -> bool {
        self.use_auth || self.use_admin
    }

    pub(crate) fn needs_transaction(&self) -> bool {
        self.use_db || self.needs_gate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_implies_transaction() {
        let options = RouteOptions {
            use_admin: true,
            ..RouteOptions::bare()
        };
        assert!(options.needs_gate());
        assert!(options.needs_transaction());
        assert!(!RouteOptions::bare().needs_transaction());
        assert!(RouteOptions::db().needs_transaction());
        assert!(!RouteOptions::db().needs_gate());
    }
}
