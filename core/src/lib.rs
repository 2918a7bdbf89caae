pub mod adherence;
pub mod dates;
pub mod db;
pub mod kv;
pub mod models;
pub mod schema;
pub mod service;
pub mod table;
pub mod targets;
pub mod weight;
