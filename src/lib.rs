pub mod report;

pub mod parsers;

pub mod collector;

pub mod app;

pub mod error;
