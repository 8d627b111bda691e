pub(crate) mod controls;
pub(crate) mod loop_driver;
pub(crate) mod pipeline;
pub(crate) mod scheduler;
pub(crate) mod stats;
