//! Integration tests for manifest generation, persistence and equality

mod cli_route;
mod generation_scenario;
mod persistence;
mod test_utils;
