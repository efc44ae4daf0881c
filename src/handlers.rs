pub mod applications;
pub mod approvals;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod owners;
pub mod parcels;
pub mod payments;
pub mod records;
pub mod transactions;
pub mod users;
