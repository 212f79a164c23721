#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod keyed_store;
pub mod log;

pub use keyed_store::KeyedStore;
