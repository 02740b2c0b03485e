pub mod programmer;

pub use programmer::ProgrammerService;
