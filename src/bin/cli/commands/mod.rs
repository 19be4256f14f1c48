pub mod add;
pub mod delete;
pub mod due;
pub mod list;
pub mod review;
pub mod serve;
pub mod stats;
