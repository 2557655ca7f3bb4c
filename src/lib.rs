pub mod analysis;
pub mod config;
pub mod dose;
pub mod error;
pub mod imaging;
pub mod utils;

mod binding;

use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use binding::classes::{
    build_report_py, compare_plans_py, PyDose, PyDoseDistribution, PyDvhReport, PyPlanComparison,
    PySliceFrame,
};

/// This is the module importable from Python:
///
/// ```python
/// import dosimars as dm
/// dist = dm.DoseDistribution([6.0, 1.0, 1.0, 3.0, 6.0], "1.345.789")
/// report = dm.build_report_py(dist, eud_exponent=1.0, dvh_bins=50)
/// ```
#[pymodule]
fn dosimars(_py: Python, m: pyo3::prelude::Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(build_report_py, m.clone())?)?;
    m.add_function(wrap_pyfunction!(compare_plans_py, m.clone())?)?;

    m.add_class::<PyDose>()?;
    m.add_class::<PyDoseDistribution>()?;
    m.add_class::<PySliceFrame>()?;
    m.add_class::<PyDvhReport>()?;
    m.add_class::<PyPlanComparison>()?;
    Ok(())
}
