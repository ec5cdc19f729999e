pub mod fakes;
mod live_service_tests;
