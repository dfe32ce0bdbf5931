pub mod common;
pub mod distance_profile;
pub mod mask;
pub mod mass;
pub mod motifs;
pub mod stomp;
