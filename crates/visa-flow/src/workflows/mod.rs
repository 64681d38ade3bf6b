pub mod applicants;
pub mod catalog;
pub mod finance;
pub mod pricing;
