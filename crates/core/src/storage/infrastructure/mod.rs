pub mod http_detection_store;
pub mod jsonl_detection_store;
