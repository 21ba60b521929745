pub mod trigger_tests;
