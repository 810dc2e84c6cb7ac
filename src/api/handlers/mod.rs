pub mod crops;
pub mod farms;
pub mod logs;
