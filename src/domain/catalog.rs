pub mod replica_catalog;
pub mod transformation_catalog;
