//! Shape value objects
//!
//! The payloads a subscriber reconstructs from notification params.

use std::fmt;

use crate::protocol::ContentType;

/// A value built from a decoded notification
pub trait Shape: fmt::Debug + Send + Sync {
    /// Content type this value was built for
    fn content_type(&self) -> ContentType;

    /// Human-readable description, as logged on delivery
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circle {
    pub radius: u32,
    pub color: String,
}

impl Circle {
    pub fn new(radius: u32, color: impl Into<String>) -> Self {
        Self {
            radius,
            color: color.into(),
        }
    }
}

impl Shape for Circle {
    fn content_type(&self) -> ContentType {
        ContentType::CIRCLE
    }

    fn describe(&self) -> String {
        format!("shape: Circle, Radius: {}, color: {}", self.radius, self.color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square {
    pub height: u32,
    pub length: u32,
    pub color: String,
}

impl Square {
    pub fn new(height: u32, length: u32, color: impl Into<String>) -> Self {
        Self {
            height,
            length,
            color: color.into(),
        }
    }
}

impl Shape for Square {
    fn content_type(&self) -> ContentType {
        ContentType::SQUARE
    }

    fn describe(&self) -> String {
        format!(
            "shape: Square, Height: {}, Length: {}, Color: {}",
            self.height, self.length, self.color
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    pub height: u32,
    pub base: u32,
    pub color: String,
}

impl Triangle {
    pub fn new(height: u32, base: u32, color: impl Into<String>) -> Self {
        Self {
            height,
            base,
            color: color.into(),
        }
    }
}

impl Shape for Triangle {
    fn content_type(&self) -> ContentType {
        ContentType::TRIANGLE
    }

    fn describe(&self) -> String {
        format!(
            "shape: Triangle, Height: {} Base: {} color: {}",
            self.height, self.base, self.color
        )
    }
}
