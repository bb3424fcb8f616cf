//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod company_repo;
pub mod contractor_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod grid_repo;
pub mod user_repo;
pub mod zip_code_repo;

pub use company_repo::CompanyRepo;
pub use contractor_repo::ContractorRepo;
pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use grid_repo::{GridPage, GridRepo, GridSource};
pub use user_repo::UserRepo;
pub use zip_code_repo::ZipCodeRepo;
