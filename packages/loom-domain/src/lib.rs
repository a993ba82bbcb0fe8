pub mod classify;
pub mod normalize;
pub mod similarity;
pub mod skills;
