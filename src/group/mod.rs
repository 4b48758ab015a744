/// Implementation of batch serialization functions for scalars and points.
pub mod serialization;
