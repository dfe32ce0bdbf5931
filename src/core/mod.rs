pub mod config;
pub mod error;
pub mod matrix_profile;
pub mod series;
