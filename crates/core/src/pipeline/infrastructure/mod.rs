pub mod drop_latest_executor;
