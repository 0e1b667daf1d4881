pub mod forecast;
pub mod merge;
pub mod periods;
