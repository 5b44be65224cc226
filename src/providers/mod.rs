// Providers layer - work performers shared by the coordinators
//
// Token signing, password hashing and the authentication gate. Providers hold
// no request state; anything touching the database takes the caller's
// connection or transaction.

pub mod authentication_provider;
pub mod crypto_provider;
pub mod token_provider;

pub use authentication_provider::AuthenticationProvider;
pub use crypto_provider::CryptoProvider;
pub use token_provider::TokenProvider;
