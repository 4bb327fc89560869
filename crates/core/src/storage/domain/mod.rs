pub mod detection_store;
