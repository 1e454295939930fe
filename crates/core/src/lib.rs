#![warn(clippy::all, missing_docs)]

//! Core logic of the fleetquery console.
//!
//! This crate hosts the chained-criteria query interpreter, the world
//! snapshot it reads and mutates through a command gateway, the console line
//! handling, and configuration used by the terminal UI.

pub mod config;
pub mod console;
pub mod query;
pub mod world;

pub use config::AppConfig;
pub use console::{execute_line, ConsoleLine, ConsoleOutput, LineLevel, LineOutcome};
pub use query::{GameMode, Invocation, QueryError, Session, Summary, TargetKind};
pub use world::{CommandGateway, GameCommand, ViewRequest, World, WorldSnapshot};
