pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod lookup;
pub mod models;
pub mod rest;
pub mod token;
