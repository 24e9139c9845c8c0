#[cfg(test)]
mod instance_tests;
