pub mod mappers;
pub mod query_order;
