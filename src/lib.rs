#![allow(async_fn_in_trait)]
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod probe;
pub mod raster;
pub mod s3;
