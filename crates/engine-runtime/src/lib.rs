pub mod actor;
pub mod error;
pub mod factory;
pub mod poll;

#[cfg(test)]
mod tests;
