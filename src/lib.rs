pub mod access;
pub mod content;
pub mod core;
pub mod coursebase_web_server;
pub mod db;
pub mod models;
pub mod routes;
