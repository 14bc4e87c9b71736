pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod repository;
pub mod service;
