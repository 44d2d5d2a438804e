pub mod account;
pub mod serve;
pub mod tools;


#[cfg(test)]
#[path = "serve_test.rs"]
mod serve_test;
