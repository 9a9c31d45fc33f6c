//! Python bindings for the battle engine using PyO3

use pyo3::prelude::*;

use crate::config::{wrap_seed, BattleFile};
use crate::error::BattleError;
use crate::replay::BattleRecord;
use crate::simulation::{run_and_aggregate, simulate};

fn value_error(e: BattleError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Invalid battle input: {}", e))
}

fn runtime_error(e: serde_json::Error) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Failed to serialize result: {}", e))
}

/// Simulate one battle from a battle-file JSON string; the file must carry a seed.
/// Returns the full result (winner, turns, log, final) as JSON.
#[pyfunction]
#[pyo3(signature = (battle_json, seed=None))]
fn simulate_json(py: Python<'_>, battle_json: &str, seed: Option<i64>) -> PyResult<String> {
    let file = BattleFile::from_json(battle_json).map_err(value_error)?;
    let config = match seed {
        Some(seed) => file.config_or(wrap_seed(seed)),
        None => file.config().map_err(value_error)?,
    };

    // Release GIL during computation
    let result = py.allow_threads(|| simulate(&file.team_a, &file.team_b, &config));

    serde_json::to_string(&result).map_err(runtime_error)
}

/// Simulate one battle from a YAML/JSON battle file on disk
#[pyfunction]
fn simulate_from_file(py: Python<'_>, path: &str) -> PyResult<String> {
    let file = BattleFile::from_file(path)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(format!("Failed to load battle file: {}", e)))?;
    let config = file.config().map_err(value_error)?;

    let result = py.allow_threads(|| simulate(&file.team_a, &file.team_b, &config));

    serde_json::to_string(&result).map_err(runtime_error)
}

/// Run `num_sims` battles over seeds derived from `master_seed` and return
/// aggregated stats as JSON.
#[pyfunction]
#[pyo3(signature = (battle_json, num_sims, master_seed=None, parallel=true))]
fn sweep_json(
    py: Python<'_>,
    battle_json: &str,
    num_sims: usize,
    master_seed: Option<u64>,
    parallel: bool,
) -> PyResult<String> {
    let file = BattleFile::from_json(battle_json).map_err(value_error)?;
    let max_turns = file.config_or(0).max_turns;

    let stats = py.allow_threads(|| {
        run_and_aggregate(&file.team_a, &file.team_b, max_turns, num_sims, master_seed, parallel)
    });

    serde_json::to_string(&stats).map_err(runtime_error)
}

/// Capture a replay record for a seeded battle file
#[pyfunction]
fn record_json(py: Python<'_>, battle_json: &str) -> PyResult<String> {
    let file = BattleFile::from_json(battle_json).map_err(value_error)?;
    let record = py.allow_threads(|| BattleRecord::capture_file(&file)).map_err(value_error)?;
    record.to_json().map_err(value_error)
}

/// True if the record re-simulates to the same log
#[pyfunction]
fn verify_record_json(py: Python<'_>, record_json: &str) -> PyResult<bool> {
    let record = BattleRecord::from_json(record_json).map_err(value_error)?;
    Ok(py.allow_threads(|| record.verify().is_ok()))
}

/// Get number of threads being used for parallel sweeps
#[pyfunction]
fn get_thread_count() -> PyResult<usize> {
    Ok(rayon::current_num_threads())
}

/// Get number of available CPU cores
#[pyfunction]
fn get_available_cores() -> PyResult<usize> {
    Ok(num_cpus::get())
}

/// Python module definition
#[pymodule]
fn idle_battle(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_json, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(sweep_json, m)?)?;
    m.add_function(wrap_pyfunction!(record_json, m)?)?;
    m.add_function(wrap_pyfunction!(verify_record_json, m)?)?;
    m.add_function(wrap_pyfunction!(get_thread_count, m)?)?;
    m.add_function(wrap_pyfunction!(get_available_cores, m)?)?;
    Ok(())
}
