//! Integration tests for the Facetry content resolution engine

mod config_integration;
mod resolver_flow;
mod test_utils;
mod variation_presentation;
