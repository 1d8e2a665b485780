//! Shape values and the factory that builds them from notifications

pub mod factory;
pub mod value;

pub use factory::{Params, ShapeCreator, ShapeFactory};
pub use value::{Circle, Shape, Square, Triangle};
