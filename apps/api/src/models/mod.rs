pub mod interview;
pub mod portfolio;
pub mod resume;
