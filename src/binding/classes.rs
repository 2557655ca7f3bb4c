use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::analysis::{self, DvhReport, PlanComparison};
use crate::binding::to_py_err;
use crate::config::AnalysisConfig;
use crate::dose::distribution::{Dose, DoseDistribution, VolumeRef};
use crate::imaging::frame::SliceFrame;
use crate::imaging::grid::PixelGrid;
use crate::imaging::resample::{HorizontalAlignment, VerticalAlignment};

/// Python representation of a single dose value
///
/// Attributes:
///     value (float): The dose in Gy
///
/// Example:
///     >>> dose = Dose(60.0)
///     >>> dose.bed(fraction_dose=2.0, alpha_beta=3.0)
#[pyclass(name = "Dose")]
#[derive(Debug, Clone)]
pub struct PyDose {
    #[pyo3(get)]
    pub value: f64,
}

#[pymethods]
impl PyDose {
    #[new]
    fn new(value: f64) -> Self {
        Self { value }
    }

    fn __repr__(&self) -> String {
        format!("Dose(value={:.4})", self.value)
    }

    fn __float__(&self) -> f64 {
        self.value
    }

    /// Biologically equivalent dose for the given fractionation
    ///
    /// Args:
    ///     fraction_dose (float): Dose per fraction in Gy
    ///     alpha_beta (float): Tissue alpha/beta factor, must be positive
    pub fn bed(&self, fraction_dose: f64, alpha_beta: f64) -> PyResult<f64> {
        Dose::new(self.value)
            .bed(fraction_dose, alpha_beta)
            .map_err(to_py_err)
    }

    /// Equivalent dose in 2 Gy fractions
    ///
    /// Args:
    ///     fraction_dose (float): Dose per fraction in Gy
    ///     alpha_beta (float): Tissue alpha/beta factor, must be positive
    pub fn eqd2(&self, fraction_dose: f64, alpha_beta: f64) -> PyResult<f64> {
        Dose::new(self.value)
            .eqd2(fraction_dose, alpha_beta)
            .map_err(to_py_err)
    }
}

impl From<Dose> for PyDose {
    fn from(dose: Dose) -> Self {
        Self { value: dose.value }
    }
}

/// Python representation of a dose distribution
///
/// Samples are sorted ascending on construction and immutable afterwards.
///
/// Attributes:
///     doses (list[float]): The sorted dose samples in Gy
///     volume_uid (str): Identity of the sampled volume
///
/// Example:
///     >>> dist = DoseDistribution([6.0, 1.0, 1.0, 3.0, 6.0], "1.345.789")
///     >>> dist.mean().value
///     3.4
#[pyclass(name = "DoseDistribution")]
#[derive(Debug, Clone)]
pub struct PyDoseDistribution {
    pub(crate) inner: DoseDistribution,
}

#[pymethods]
impl PyDoseDistribution {
    #[new]
    fn new(doses: Vec<f64>, volume_uid: String) -> PyResult<Self> {
        DoseDistribution::new(doses, VolumeRef::new(volume_uid))
            .map(|inner| Self { inner })
            .map_err(to_py_err)
    }

    #[getter]
    fn doses(&self) -> Vec<f64> {
        self.inner.doses().to_vec()
    }

    #[getter]
    fn volume_uid(&self) -> String {
        self.inner.volume().uid().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "DoseDistribution(samples={}, volume='{}')",
            self.inner.len(),
            self.inner.volume().uid()
        )
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        other
            .extract::<PyRef<'_, PyDoseDistribution>>()
            .map(|other| other.inner == self.inner)
            .unwrap_or(false)
    }

    fn __hash__(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.inner.hash(&mut hasher);
        hasher.finish()
    }

    pub fn mean(&self) -> PyResult<PyDose> {
        self.inner.mean().map(PyDose::from).map_err(to_py_err)
    }

    pub fn median(&self) -> PyResult<PyDose> {
        self.inner.median().map(PyDose::from).map_err(to_py_err)
    }

    pub fn min(&self) -> PyResult<PyDose> {
        self.inner.min().map(PyDose::from).map_err(to_py_err)
    }

    pub fn max(&self) -> PyResult<PyDose> {
        self.inner.max().map(PyDose::from).map_err(to_py_err)
    }

    /// Sample standard deviation (N-1)
    pub fn stddev(&self) -> PyResult<f64> {
        self.inner.stddev().map_err(to_py_err)
    }

    /// Population root mean square deviation (N)
    pub fn rmsdev(&self) -> PyResult<f64> {
        self.inner.rmsdev().map_err(to_py_err)
    }

    /// Dose received by at least `percent`% of the volume
    pub fn d(&self, percent: f64) -> PyResult<PyDose> {
        self.inner.d(percent).map(PyDose::from).map_err(to_py_err)
    }

    /// Percentage of the volume receiving at least `dose`
    pub fn v(&self, dose: f64) -> PyResult<f64> {
        self.inner.v(dose).map_err(to_py_err)
    }

    /// Generalized equivalent uniform dose with power-mean exponent `a`
    pub fn eud(&self, a: f64) -> PyResult<PyDose> {
        self.inner.eud(a).map(PyDose::from).map_err(to_py_err)
    }

    /// Homogeneity index (D2 - D98) / D50
    pub fn hindex(&self) -> PyResult<f64> {
        self.inner.hindex().map_err(to_py_err)
    }
}

/// Python representation of a 2D image slice placed in patient space
///
/// All geometry attributes start as None and are assigned independently,
/// typically from DICOM metadata. Pixel data is attached as a flat list in
/// row-major order (column index varying fastest).
///
/// Example:
///     >>> frame = SliceFrame()
///     >>> frame.pos_x, frame.pos_y, frame.pos_slice = -5.0, -3.0, 50.0
///     >>> frame.cosines = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
#[pyclass(name = "SliceFrame")]
#[derive(Debug, Clone, Default)]
pub struct PySliceFrame {
    pub(crate) inner: SliceFrame,
}

#[pymethods]
impl PySliceFrame {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    fn __repr__(&self) -> String {
        format!(
            "SliceFrame(columns={:?}, rows={:?}, pos_slice={:?})",
            self.inner.columns(),
            self.inner.rows(),
            self.inner.pos_slice()
        )
    }

    #[getter]
    fn pos_x(&self) -> Option<f64> {
        self.inner.pos_x()
    }

    #[setter]
    fn set_pos_x(&mut self, value: f64) {
        self.inner.set_pos_x(value);
    }

    #[getter]
    fn pos_y(&self) -> Option<f64> {
        self.inner.pos_y()
    }

    #[setter]
    fn set_pos_y(&mut self, value: f64) {
        self.inner.set_pos_y(value);
    }

    #[getter]
    fn pos_slice(&self) -> Option<f64> {
        self.inner.pos_slice()
    }

    #[setter]
    fn set_pos_slice(&mut self, value: f64) {
        self.inner.set_pos_slice(value);
    }

    #[getter]
    fn col_spacing(&self) -> Option<f64> {
        self.inner.col_spacing()
    }

    #[setter]
    fn set_col_spacing(&mut self, value: f64) -> PyResult<()> {
        self.inner.set_col_spacing(value).map_err(to_py_err)
    }

    #[getter]
    fn row_spacing(&self) -> Option<f64> {
        self.inner.row_spacing()
    }

    #[setter]
    fn set_row_spacing(&mut self, value: f64) -> PyResult<()> {
        self.inner.set_row_spacing(value).map_err(to_py_err)
    }

    #[getter]
    fn cosines(&self) -> Option<[f64; 6]> {
        self.inner.cosines()
    }

    #[setter]
    fn set_cosines(&mut self, cosines: [f64; 6]) {
        self.inner.set_cosines(cosines);
    }

    #[getter]
    fn columns(&self) -> Option<u32> {
        self.inner.columns()
    }

    #[setter]
    fn set_columns(&mut self, columns: u32) {
        self.inner.set_columns(columns);
    }

    #[getter]
    fn rows(&self) -> Option<u32> {
        self.inner.rows()
    }

    #[setter]
    fn set_rows(&mut self, rows: u32) {
        self.inner.set_rows(rows);
    }

    #[getter]
    fn pixels(&self) -> Option<Vec<i32>> {
        self.inner.pixels().map(|grid| grid.data().to_vec())
    }

    /// Attaches pixel data as a flat row-major list; `columns` and `rows`
    /// must be set first and the length must match their product
    pub fn attach_pixels(&mut self, data: Vec<i32>) -> PyResult<()> {
        let columns = self
            .inner
            .columns()
            .ok_or_else(|| to_py_err(crate::error::Error::MissingGeometry("columns")))?;
        let rows = self
            .inner
            .rows()
            .ok_or_else(|| to_py_err(crate::error::Error::MissingGeometry("rows")))?;
        let grid = PixelGrid::from_flat(columns, rows, data).map_err(to_py_err)?;
        self.inner.attach_pixels(grid).map_err(to_py_err)
    }

    /// Converts paired pixel indices to patient coordinates, returning the
    /// x, y and z arrays
    pub fn coordinates_from_indices(
        &self,
        col_indices: Vec<i32>,
        row_indices: Vec<i32>,
    ) -> PyResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        self.inner
            .coordinates_from_indices(&col_indices, &row_indices)
            .map_err(to_py_err)
    }

    /// Converts patient coordinates to (column, row) pixel indices
    pub fn coordinates_to_indices(
        &self,
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    ) -> PyResult<(Vec<i32>, Vec<i32>)> {
        self.inner
            .coordinates_to_indices(&x, &y, &z)
            .map_err(to_py_err)
    }

    /// Reads the pixels closest to the given patient coordinates
    pub fn extract_pixels(&self, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> PyResult<Vec<i32>> {
        self.inner.extract_pixels(&x, &y, &z).map_err(to_py_err)
    }

    /// Writes one value per flat pixel index
    pub fn insert_pixels(&mut self, indices: Vec<usize>, values: Vec<i32>) -> PyResult<()> {
        self.inner.insert_pixels(&indices, &values).map_err(to_py_err)
    }

    /// Broadcasts one value across the given flat pixel indices
    pub fn set_pixels(&mut self, indices: Vec<usize>, value: i32) -> PyResult<()> {
        self.inner.set_pixels(&indices, value).map_err(to_py_err)
    }

    /// Resizes the pixel grid, cropping or zero-padding each axis under the
    /// given edge policy
    ///
    /// Args:
    ///     columns (int): Target column count
    ///     rows (int): Target row count
    ///     hor (str): "even", "left" or "right"
    ///     ver (str): "even", "top" or "bottom"
    #[pyo3(signature = (columns, rows, hor = "even", ver = "even"))]
    pub fn set_resolution(
        &mut self,
        columns: u32,
        rows: u32,
        hor: &str,
        ver: &str,
    ) -> PyResult<()> {
        let horizontal: HorizontalAlignment = hor.parse().map_err(to_py_err)?;
        let vertical: VerticalAlignment = ver.parse().map_err(to_py_err)?;
        self.inner
            .set_resolution(columns, rows, horizontal, vertical)
            .map_err(to_py_err)
    }
}

/// Python representation of a DVH summary report
#[pyclass(name = "DvhReport")]
#[derive(Debug, Clone)]
pub struct PyDvhReport {
    pub(crate) inner: DvhReport,
}

#[pymethods]
impl PyDvhReport {
    #[getter]
    fn volume_uid(&self) -> String {
        self.inner.volume_uid.clone()
    }

    #[getter]
    fn samples(&self) -> usize {
        self.inner.samples
    }

    #[getter]
    fn min(&self) -> f64 {
        self.inner.min
    }

    #[getter]
    fn max(&self) -> f64 {
        self.inner.max
    }

    #[getter]
    fn mean(&self) -> f64 {
        self.inner.mean
    }

    #[getter]
    fn median(&self) -> f64 {
        self.inner.median
    }

    #[getter]
    fn stddev(&self) -> f64 {
        self.inner.stddev
    }

    #[getter]
    fn d2(&self) -> f64 {
        self.inner.d2
    }

    #[getter]
    fn d50(&self) -> f64 {
        self.inner.d50
    }

    #[getter]
    fn d98(&self) -> f64 {
        self.inner.d98
    }

    #[getter]
    fn hindex(&self) -> f64 {
        self.inner.hindex
    }

    #[getter]
    fn eud(&self) -> f64 {
        self.inner.eud
    }

    #[getter]
    fn eud_exponent(&self) -> f64 {
        self.inner.eud_exponent
    }

    /// The cumulative DVH curve as (dose, volume_percent) tuples
    fn curve(&self) -> Vec<(f64, f64)> {
        self.inner
            .curve
            .iter()
            .map(|point| (point.dose, point.volume_percent))
            .collect()
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!(
            "DvhReport(volume='{}', samples={}, mean={:.3})",
            self.inner.volume_uid, self.inner.samples, self.inner.mean
        )
    }
}

/// Python representation of a two-plan comparison
#[pyclass(name = "PlanComparison")]
#[derive(Debug, Clone)]
pub struct PyPlanComparison {
    pub(crate) inner: PlanComparison,
}

#[pymethods]
impl PyPlanComparison {
    #[getter]
    fn reference(&self) -> PyDvhReport {
        PyDvhReport {
            inner: self.inner.reference.clone(),
        }
    }

    #[getter]
    fn comparison(&self) -> PyDvhReport {
        PyDvhReport {
            inner: self.inner.comparison.clone(),
        }
    }

    #[getter]
    fn mean_difference(&self) -> f64 {
        self.inner.mean_difference
    }

    #[getter]
    fn d50_difference(&self) -> f64 {
        self.inner.d50_difference
    }

    fn __repr__(&self) -> String {
        format!(
            "PlanComparison(mean_difference={:.3}, d50_difference={:.3})",
            self.inner.mean_difference, self.inner.d50_difference
        )
    }
}

/// Builds a DVH report for one distribution.
///
/// Uses a Python-friendly signature so the analysis parameters get defaults.
#[pyfunction]
#[pyo3(signature = (distribution, eud_exponent = 1.0, dvh_bins = 100))]
pub fn build_report_py(
    distribution: &PyDoseDistribution,
    eud_exponent: f64,
    dvh_bins: usize,
) -> PyResult<PyDvhReport> {
    let config = AnalysisConfig {
        eud_exponent,
        dvh_bins,
    };
    analysis::build_report(&distribution.inner, &config)
        .map(|inner| PyDvhReport { inner })
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Builds reports for a reference and a comparison plan concurrently and
/// returns them with the headline differences.
#[pyfunction]
#[pyo3(signature = (reference, comparison, eud_exponent = 1.0, dvh_bins = 100))]
pub fn compare_plans_py(
    reference: &PyDoseDistribution,
    comparison: &PyDoseDistribution,
    eud_exponent: f64,
    dvh_bins: usize,
) -> PyResult<PyPlanComparison> {
    let config = AnalysisConfig {
        eud_exponent,
        dvh_bins,
    };
    analysis::compare_plans(&reference.inner, &comparison.inner, &config)
        .map(|inner| PyPlanComparison { inner })
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}
