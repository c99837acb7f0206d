//! Documentation module for the full-sync dht.
//!
//! This module contains high-level documentation to explain the project, define
//! terms and aid navigation of the other documentation.

pub mod glossary;

pub mod exchange;
