//! Row fields.

use std::ops::{Index, IndexMut};

use barn_core::{Error, Result};

use crate::raster::Image;

/// One value of a dataset row
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// H×W×C image
    Image(Image),
    /// Scalar label, e.g. a steering angle
    Scalar(f32),
    /// Fixed-length numeric payload
    Vector(Vec<f32>),
}

impl Field {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Image(_) => "image",
            Field::Scalar(_) => "scalar",
            Field::Vector(_) => "vector",
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Field::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn into_image(self) -> Result<Image> {
        match self {
            Field::Image(image) => Ok(image),
            other => Err(Error::InvalidArgument(format!(
                "Expected an image field, got {}",
                other.kind()
            ))),
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Field::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f32]> {
        match self {
            Field::Vector(values) => Some(values),
            _ => None,
        }
    }

    /// Numeric negation; the default label mirror for horizontal flips
    pub fn negate(self) -> Result<Field> {
        match self {
            Field::Scalar(value) => Ok(Field::Scalar(-value)),
            Field::Vector(values) => Ok(Field::Vector(values.into_iter().map(|v| -v).collect())),
            Field::Image(_) => Err(Error::InvalidArgument(
                "Cannot negate an image field".to_string(),
            )),
        }
    }
}

impl From<Image> for Field {
    fn from(image: Image) -> Self {
        Field::Image(image)
    }
}

impl From<f32> for Field {
    fn from(value: f32) -> Self {
        Field::Scalar(value)
    }
}

impl From<Vec<f32>> for Field {
    fn from(values: Vec<f32>) -> Self {
        Field::Vector(values)
    }
}

/// Ordered, fixed-length sequence of fields; field 0 is conventionally the image
#[derive(Debug, Clone, PartialEq)]
pub struct Row(Vec<Field>);

impl Row {
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.0.get(index)
    }

    pub fn fields(&self) -> &[Field] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.0
    }
}

impl From<Vec<Field>> for Row {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl Index<usize> for Row {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.0[index]
    }
}

impl IndexMut<usize> for Row {
    fn index_mut(&mut self, index: usize) -> &mut Field {
        &mut self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate() {
        assert_eq!(Field::Scalar(0.25).negate().unwrap(), Field::Scalar(-0.25));
        assert_eq!(
            Field::Vector(vec![1.0, -2.0]).negate().unwrap(),
            Field::Vector(vec![-1.0, 2.0])
        );

        let image = Field::Image(Image::filled_u8(2, 2, 1, 0).unwrap());
        assert!(matches!(image.negate(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_into_image_wrong_kind() {
        let err = Field::Scalar(1.0).into_image().unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Expected an image field, got scalar");
    }

    #[test]
    fn test_row_access() {
        let image = Image::filled_u8(1, 1, 3, 5).unwrap();
        let mut row = Row::new(vec![image.into(), Field::Scalar(0.5)]);
        assert_eq!(row.arity(), 2);
        assert_eq!(row[1].as_scalar(), Some(0.5));
        assert!(row.get(2).is_none());

        row[1] = Field::Scalar(-0.5);
        assert_eq!(row.get(1).and_then(Field::as_scalar), Some(-0.5));
        assert!(row[0].as_image().is_some());
    }
}
