pub mod selftest;
pub mod status;
