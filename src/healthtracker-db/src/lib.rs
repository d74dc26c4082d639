mod db;
pub use db::DatabaseHandler;

mod type_impl;
