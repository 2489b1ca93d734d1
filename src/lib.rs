// Library target shared by integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can import types via `anatolexic::puzzle::*` / `anatolexic::app::*`.
// Some items are only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod event;
pub mod lexicon;
pub mod logging;
pub mod lookup;
pub mod puzzle;
pub mod session;
pub mod ui;
