pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, SignupInput};
pub use auth_service_impl::SeaOrmAuthService;

pub mod ownership;
pub use ownership::{AccessError, OwnedResource, Owner, OwnershipGuard};

pub mod reset_code;
pub use reset_code::{LogResetCodeSender, ResetCodeSender};

pub mod token;
pub use token::{AuthUser, Claims, TokenError, TokenService};
