//! Stacking generated rows into per-field columns.

use barn_core::{Error, ImageDimensions, Result, SampleType};

use crate::field::{Field, Row};
use crate::raster::{Image, PixelData};

/// N images of one shape and sample type, laid out N×H×W×C
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    count: usize,
    dims: ImageDimensions,
    data: PixelData,
}

impl ImageStack {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn dims(&self) -> ImageDimensions {
        self.dims
    }

    pub fn sample_type(&self) -> SampleType {
        self.data.sample_type()
    }

    /// `[N, H, W, C]`
    pub fn shape(&self) -> [usize; 4] {
        [
            self.count,
            self.dims.height as usize,
            self.dims.width as usize,
            self.dims.channels as usize,
        ]
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Copies out the image at `index`
    pub fn image(&self, index: usize) -> Option<Image> {
        if index >= self.count {
            return None;
        }
        let size = self.dims.sample_count();
        let range = index * size..(index + 1) * size;
        let data = match &self.data {
            PixelData::U8(data) => PixelData::U8(data[range].to_vec()),
            PixelData::F32(data) => PixelData::F32(data[range].to_vec()),
        };
        Image::new(self.dims, data).ok()
    }
}

/// One stacked field position
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Images(ImageStack),
    Scalars(Vec<f32>),
    /// `data` holds `width` values per row
    Vectors { width: usize, data: Vec<f32> },
}

impl Column {
    fn stack(position: usize, fields: Vec<Field>) -> Result<Self> {
        let mut fields = fields.into_iter();
        let Some(first) = fields.next() else {
            return Err(Error::ShapeMismatch(format!("field {} has no values", position)));
        };

        match first {
            Field::Image(image) => {
                let dims = image.dims();
                let sample_type = image.sample_type();
                let mut data = image.into_data();
                let mut count = 1;
                for field in fields {
                    let image = match field {
                        Field::Image(image) => image,
                        other => return Err(kind_mismatch(position, "image", &other)),
                    };
                    if image.dims() != dims || image.sample_type() != sample_type {
                        return Err(Error::ShapeMismatch(format!(
                            "field {}: image {} ({}) does not match {} ({})",
                            position,
                            image.dims(),
                            image.sample_type(),
                            dims,
                            sample_type
                        )));
                    }
                    match (&mut data, image.into_data()) {
                        (PixelData::U8(acc), PixelData::U8(more)) => acc.extend(more),
                        (PixelData::F32(acc), PixelData::F32(more)) => acc.extend(more),
                        _ => {}
                    }
                    count += 1;
                }
                Ok(Column::Images(ImageStack { count, dims, data }))
            }
            Field::Scalar(value) => {
                let mut values = vec![value];
                for field in fields {
                    match field {
                        Field::Scalar(v) => values.push(v),
                        other => return Err(kind_mismatch(position, "scalar", &other)),
                    }
                }
                Ok(Column::Scalars(values))
            }
            Field::Vector(first) => {
                let width = first.len();
                let mut data = first;
                for field in fields {
                    match field {
                        Field::Vector(v) if v.len() == width => data.extend(v),
                        Field::Vector(v) => {
                            return Err(Error::ShapeMismatch(format!(
                                "field {}: vector of length {} does not match {}",
                                position,
                                v.len(),
                                width
                            )))
                        }
                        other => return Err(kind_mismatch(position, "vector", &other)),
                    }
                }
                Ok(Column::Vectors { width, data })
            }
        }
    }

    fn field(&self, index: usize) -> Option<Field> {
        match self {
            Column::Images(stack) => stack.image(index).map(Field::Image),
            Column::Scalars(values) => values.get(index).copied().map(Field::Scalar),
            Column::Vectors { width, data } => data
                .get(index * width..(index + 1) * width)
                .map(|v| Field::Vector(v.to_vec())),
        }
    }
}

fn kind_mismatch(position: usize, expected: &str, found: &Field) -> Error {
    Error::ShapeMismatch(format!(
        "field {}: expected {}, found {}",
        position,
        expected,
        found.kind()
    ))
}

/// Generated rows organized per field: all images together, all labels together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    len: usize,
    columns: Vec<Column>,
}

impl Batch {
    /// Stacks rows column-wise. Every row must have the same arity and each
    /// field position the same kind and shape.
    pub fn stack(rows: Vec<Row>) -> Result<Self> {
        let len = rows.len();
        let Some(arity) = rows.first().map(Row::arity) else {
            return Ok(Self::default());
        };

        let mut columns: Vec<Vec<Field>> = (0..arity).map(|_| Vec::with_capacity(len)).collect();
        for (i, row) in rows.into_iter().enumerate() {
            if row.arity() != arity {
                return Err(Error::ShapeMismatch(format!(
                    "row {} has {} fields, expected {}",
                    i,
                    row.arity(),
                    arity
                )));
            }
            for (column, field) in columns.iter_mut().zip(row.into_fields()) {
                column.push(field);
            }
        }

        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(position, fields)| Column::stack(position, fields))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { len, columns })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of field positions
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    pub fn images(&self, position: usize) -> Option<&ImageStack> {
        match self.columns.get(position)? {
            Column::Images(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn scalars(&self, position: usize) -> Option<&[f32]> {
        match self.columns.get(position)? {
            Column::Scalars(values) => Some(values),
            _ => None,
        }
    }

    /// Vector width and flattened values
    pub fn vectors(&self, position: usize) -> Option<(usize, &[f32])> {
        match self.columns.get(position)? {
            Column::Vectors { width, data } => Some((*width, data)),
            _ => None,
        }
    }

    /// Rebuilds row `index` from the columns
    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.len {
            return None;
        }
        self.columns
            .iter()
            .map(|column| column.field(index))
            .collect::<Option<Vec<_>>>()
            .map(Row::new)
    }
}
