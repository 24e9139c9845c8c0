#![cfg(test)]

pub mod common;
pub mod definition_tests;
pub mod resolution_tests;
pub mod tree_tests;
