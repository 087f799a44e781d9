pub mod commute_processor;
