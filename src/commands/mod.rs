pub mod generate;
pub mod prefetch;
pub mod seed;
pub mod status;
