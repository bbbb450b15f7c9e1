pub use super::crops::Entity as Crops;
pub use super::employees::Entity as Employees;
pub use super::farms::Entity as Farms;
pub use super::livestock::Entity as Livestock;
pub use super::users::Entity as Users;
