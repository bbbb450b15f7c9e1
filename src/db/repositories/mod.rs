pub mod crop;
pub mod employee;
pub mod farm;
pub mod livestock;
pub mod user;
