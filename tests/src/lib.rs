//! End to end tests for the NEPO compiler crates.
//!
//! Fixtures live under `tests/test_data/<module>/`, resolved by `utils::get_test_file_path`.

#[cfg(test)]
mod utils;

#[cfg(test)]
mod configuration;
#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod dispatch;
#[cfg(test)]
mod pipeline;
