// src/core/mod.rs

pub mod engine;
pub mod normalizer;
pub mod synonyms;
pub mod twins;
pub mod types;
