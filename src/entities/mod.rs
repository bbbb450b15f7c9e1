pub mod prelude;

pub mod crops;
pub mod employees;
pub mod farms;
pub mod livestock;
pub mod users;
