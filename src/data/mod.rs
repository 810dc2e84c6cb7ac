pub mod crops;
pub mod farms;
