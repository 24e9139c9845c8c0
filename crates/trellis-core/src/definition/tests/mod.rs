#[cfg(test)]
mod definition_tests;
#[cfg(test)]
mod format_tests;
