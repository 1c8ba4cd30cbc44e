use crate::RefCount;

/// A numeric n-dimensional array, stored flat in row-major order.
#[derive(Debug, Clone)]
pub struct Array {
	shape: Vec<usize>,
	data: RefCount<[f64]>,
}

impl Array {
	/// Creates an array of the given shape, or `None` if `data` doesn't have exactly as many
	/// elements as `shape` describes.
	pub fn new(shape: impl Into<Vec<usize>>, data: impl Into<Vec<f64>>) -> Option<Self> {
		let (shape, data) = (shape.into(), data.into());

		if shape.iter().product::<usize>() != data.len() {
			return None;
		}

		Some(Self { shape, data: data.into_boxed_slice().into() })
	}

	/// A one-dimensional array.
	pub fn vector(data: impl Into<Vec<f64>>) -> Self {
		let data = data.into();
		Self { shape: vec![data.len()], data: data.into_boxed_slice().into() }
	}

	pub fn shape(&self) -> &[usize] {
		&self.shape
	}

	pub fn ndim(&self) -> usize {
		self.shape.len()
	}

	pub fn data(&self) -> &[f64] {
		&self.data
	}

	pub fn ptr_eq(&self, rhs: &Self) -> bool {
		self.data.ptr_eq(&rhs.data)
	}

	pub fn addr(&self) -> usize {
		self.data.addr()
	}
}
