pub mod programmers;
pub mod service;
