pub mod programmer;

pub use programmer::Programmer;
