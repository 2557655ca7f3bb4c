pub mod classes;

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;

use crate::error::Error;

/// Maps a core error onto the Python exception surface. Argument, range and
/// degenerate-input failures all arrive as `ValueError` with the original
/// message.
pub(crate) fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}
