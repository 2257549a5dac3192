//! End-to-end tests for the playtrack engine, bootstrap registry, and the
//! bundled console logger.


mod bootstrap_test;
mod dispatch_test;
mod metadata_test;
mod registration_test;
