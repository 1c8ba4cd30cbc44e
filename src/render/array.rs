use crate::value::Array;

/// Arrays with more elements than this are summarized.
const THRESHOLD: usize = 50;

/// How many elements are kept at each end of a summarized axis.
const EDGE_ITEMS: usize = 2;

fn format_element(element: f64) -> String {
	if element.is_nan() {
		"nan".to_owned()
	} else if element.is_infinite() {
		(if element < 0.0 { "-inf" } else { "inf" }).to_owned()
	} else if element.fract() == 0.0 && element.abs() < 1e16 {
		format!("{element:.0}.")
	} else {
		element.to_string()
	}
}

/// The indices along an axis of length `len` that are shown, with `None` marking the gap.
fn shown_indices(len: usize, summarize: bool) -> Vec<Option<usize>> {
	if summarize && len > 2 * EDGE_ITEMS {
		(0..EDGE_ITEMS).map(Some).chain([None]).chain((len - EDGE_ITEMS..len).map(Some)).collect()
	} else {
		(0..len).map(Some).collect()
	}
}

struct Layout<'a> {
	shape: &'a [usize],
	data: &'a [f64],
	width: usize,
	summarize: bool,
}

impl Layout<'_> {
	fn axis(&self, axis: usize, offset: usize) -> String {
		let len = self.shape[axis];
		let stride = self.shape[axis + 1..].iter().product::<usize>();
		let indices = shown_indices(len, self.summarize);

		let parts = indices.iter().map(|index| match index {
			None => "...".to_owned(),
			Some(idx) if axis + 1 == self.shape.len() => {
				format!("{:>width$}", format_element(self.data[offset + idx]), width = self.width)
			}
			Some(idx) => self.axis(axis + 1, offset + idx * stride),
		});

		let separator = if axis + 1 == self.shape.len() {
			" ".to_owned()
		} else {
			format!("{}{}", "\n".repeat(self.shape.len() - axis - 1), " ".repeat(axis + 1))
		};

		format!("[{}]", parts.collect::<Vec<_>>().join(&separator))
	}
}

/// Renders the elements of an array the way numeric libraries print them.
fn format_elements(array: &Array) -> String {
	let data = array.data();

	if array.ndim() == 0 {
		return data.first().map_or_else(String::new, |&element| format_element(element));
	}

	let summarize = data.len() > THRESHOLD;
	let width = data.iter().map(|&element| format_element(element).len()).max().unwrap_or(0);

	Layout { shape: array.shape(), data, width, summarize }.axis(0, 0)
}

/// Renders an array, annotated with its shape.
///
/// `minimize` is used for nested arrays: if the full form would be long or has more than one
/// dimension, only the first element is shown.
pub fn format_array(array: &Array, minimize: bool) -> String {
	let mut rendered = if array.ndim() == 0 {
		"array(".to_owned()
	} else {
		let mut shape = array.shape().iter().map(usize::to_string).collect::<Vec<_>>();
		if shape.len() < 2 {
			shape.push(String::new());
		}

		let shape = shape.join("x");
		if shape.len() < 10 {
			format!("{shape} array(")
		} else {
			format!("{shape} array(\n")
		}
	};

	let elements = format_elements(array);
	let ndim = array.ndim();

	if minimize && (elements.len() > THRESHOLD || ndim > 1) {
		let first =
			array.data().first().map_or_else(String::new, |&element| format_element(element));
		rendered.push_str(&format!("{}{first}...{}", "[".repeat(ndim), "]".repeat(ndim)));
	} else {
		if ndim > 1 && !rendered.ends_with('\n') {
			rendered.push('\n');
		}
		rendered.push_str(&elements);
	}

	rendered.push(')');
	rendered
}
