pub mod detection_task;
pub mod infrastructure;
pub mod sample_pacer;
pub mod sampler;
pub mod task_dispatcher;
