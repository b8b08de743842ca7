//! ScopeGen Library
//!
//! This library converts exported facility configuration documents into
//! radar-scope display profiles: parsing the source JSON, resolving airport
//! and weather radar references, placing maps on the control bar, and
//! reading and writing the profile XML.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;
