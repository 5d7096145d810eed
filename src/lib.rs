//! Field-of-view engine for a yawed observer in a 3D scene.
//!
//! Two passes share one raycast backend: a periodic detection pass that
//! finds which targets the observer can see, and a per-tick view pass
//! that sweeps the view cone, refines occlusion edges by bisection and
//! fan-triangulates the result into an observer-local mesh.
//!
//! With the `python` feature the crate also builds as a Python module
//! exposing `compute_frame_json`, which takes a JSON string (frame
//! params) and returns a JSON string (frame result).

pub mod backend;
pub mod collision;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod mesh;
pub mod observer;
pub mod scene;
pub mod schedule;
pub mod types;
pub mod view;

pub use config::FovConfig;
pub use error::FovError;
pub use observer::{Observer, TickOutcome};

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;

    /// Compute one frame.
    ///
    /// Takes a JSON string matching the frame params schema and
    /// returns a JSON string matching the frame result schema.
    #[pyfunction]
    fn compute_frame_json(params_json: &str) -> PyResult<String> {
        crate::frame::compute_frame_json(params_json).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Failed to compute frame: {e}"
            ))
        })
    }

    /// FOV engine, importable from Python.
    #[pymodule]
    fn fov_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(compute_frame_json, m)?)?;
        Ok(())
    }
}
