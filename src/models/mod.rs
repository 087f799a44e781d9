pub mod measurement;
pub mod plan;
pub mod row;
pub mod trip;
