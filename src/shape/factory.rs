//! Shape factory
//!
//! Maps a content type to a creator that turns notification params into a
//! [`Shape`]. The three built-in types are pre-registered; new types become
//! deliverable through [`ShapeFactory::register`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::value::{Circle, Shape, Square, Triangle};
use crate::error::ShapeError;
use crate::protocol::ContentType;

/// Creator for one content type
pub type ShapeCreator =
    Arc<dyn Fn(&[Value]) -> Result<Box<dyn Shape>, ShapeError> + Send + Sync + 'static>;

/// Registry of shape creators keyed by content type
#[derive(Clone)]
pub struct ShapeFactory {
    creators: HashMap<ContentType, ShapeCreator>,
}

impl ShapeFactory {
    /// Factory with Circle, Square and Triangle registered
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(ContentType::CIRCLE, create_circle);
        factory.register(ContentType::SQUARE, create_square);
        factory.register(ContentType::TRIANGLE, create_triangle);
        factory
    }

    /// Factory with nothing registered
    pub fn empty() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Register (or replace) the creator for a content type
    pub fn register<F>(&mut self, content_type: ContentType, creator: F)
    where
        F: Fn(&[Value]) -> Result<Box<dyn Shape>, ShapeError> + Send + Sync + 'static,
    {
        self.creators.insert(content_type, Arc::new(creator));
    }

    /// Whether a creator exists for this content type
    pub fn supports(&self, content_type: ContentType) -> bool {
        self.creators.contains_key(&content_type)
    }

    /// Build a shape from notification params
    pub fn create(
        &self,
        content_type: ContentType,
        params: &[Value],
    ) -> Result<Box<dyn Shape>, ShapeError> {
        let creator = self
            .creators
            .get(&content_type)
            .ok_or(ShapeError::UnknownType(content_type))?;
        creator(params)
    }
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShapeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.creators.keys().copied().collect();
        types.sort();
        f.debug_struct("ShapeFactory").field("types", &types).finish()
    }
}

/// Positional param reader that produces factory errors
pub struct Params<'a> {
    kind: &'static str,
    values: &'a [Value],
}

impl<'a> Params<'a> {
    /// Check arity up front
    pub fn expect(
        kind: &'static str,
        values: &'a [Value],
        expected: usize,
    ) -> Result<Self, ShapeError> {
        if values.len() != expected {
            return Err(ShapeError::Arity {
                kind,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { kind, values })
    }

    pub fn u32(&self, index: usize) -> Result<u32, ShapeError> {
        self.values
            .get(index)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ShapeError::InvalidParam {
                kind: self.kind,
                index,
                expected: "a non-negative integer",
            })
    }

    pub fn string(&self, index: usize) -> Result<String, ShapeError> {
        self.values
            .get(index)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(ShapeError::InvalidParam {
                kind: self.kind,
                index,
                expected: "a string",
            })
    }
}

fn create_circle(values: &[Value]) -> Result<Box<dyn Shape>, ShapeError> {
    let p = Params::expect("Circle", values, 2)?;
    Ok(Box::new(Circle::new(p.u32(0)?, p.string(1)?)))
}

fn create_square(values: &[Value]) -> Result<Box<dyn Shape>, ShapeError> {
    let p = Params::expect("Square", values, 3)?;
    Ok(Box::new(Square::new(p.u32(0)?, p.u32(1)?, p.string(2)?)))
}

fn create_triangle(values: &[Value]) -> Result<Box<dyn Shape>, ShapeError> {
    let p = Params::expect("Triangle", values, 3)?;
    Ok(Box::new(Triangle::new(p.u32(0)?, p.u32(1)?, p.string(2)?)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_builtin_shapes() {
        let factory = ShapeFactory::new();

        let square = factory
            .create(ContentType::SQUARE, &[json!(4), json!(4), json!("green")])
            .unwrap();
        assert_eq!(square.content_type(), ContentType::SQUARE);
        assert_eq!(
            square.describe(),
            "shape: Square, Height: 4, Length: 4, Color: green"
        );

        let circle = factory
            .create(ContentType::CIRCLE, &[json!(5), json!("blue")])
            .unwrap();
        assert_eq!(circle.content_type(), ContentType::CIRCLE);
    }

    #[test]
    fn test_unknown_type() {
        let factory = ShapeFactory::new();
        let err = factory.create(ContentType::new(7), &[]).unwrap_err();
        assert_eq!(err, ShapeError::UnknownType(ContentType::new(7)));
    }

    #[test]
    fn test_bad_params() {
        let factory = ShapeFactory::new();

        let err = factory
            .create(ContentType::CIRCLE, &[json!(5)])
            .unwrap_err();
        assert!(matches!(err, ShapeError::Arity { expected: 2, actual: 1, .. }));

        let err = factory
            .create(ContentType::CIRCLE, &[json!("five"), json!("blue")])
            .unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParam { index: 0, .. }));

        let err = factory
            .create(ContentType::TRIANGLE, &[json!(-1), json!(2), json!("red")])
            .unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParam { index: 0, .. }));
    }

    #[test]
    fn test_read_past_declared_arity_is_an_error() {
        let values = [json!(3)];
        let p = Params::expect("Dot", &values, 1).unwrap();

        assert_eq!(p.u32(0), Ok(3));
        assert!(matches!(p.u32(1), Err(ShapeError::InvalidParam { index: 1, .. })));
        assert!(matches!(p.string(5), Err(ShapeError::InvalidParam { index: 5, .. })));
    }

    #[test]
    fn test_register_custom_type() {
        #[derive(Debug)]
        struct Dot;

        impl Shape for Dot {
            fn content_type(&self) -> ContentType {
                ContentType::new(4)
            }

            fn describe(&self) -> String {
                "shape: Dot".into()
            }
        }

        let mut factory = ShapeFactory::new();
        assert!(!factory.supports(ContentType::new(4)));

        factory.register(ContentType::new(4), |_| Ok(Box::new(Dot) as Box<dyn Shape>));
        assert!(factory.supports(ContentType::new(4)));
        assert_eq!(
            factory.create(ContentType::new(4), &[]).unwrap().describe(),
            "shape: Dot"
        );
    }
}
