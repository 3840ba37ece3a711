pub mod compose;
pub mod model;
pub mod row;
