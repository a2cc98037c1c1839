// HTML → PDF rendering: request validation, browser seam, Chromium backend,
// the renderer itself and its HTTP boundary.

pub mod browser;
pub mod chromium;
pub mod error;
pub mod handlers;
pub mod request;
pub mod service;

#[cfg(test)]
pub mod testing;
