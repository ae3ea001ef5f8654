pub mod custom_scheduler;
